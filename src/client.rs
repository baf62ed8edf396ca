use crate::error::Error;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use tracing::instrument;
use tracing::Level;

/// Production endpoint of the ZeroSSL REST API.
pub const ZEROSSL_BASE_URL: &str = "https://api.zerossl.com";

/// A builder that is used to configure and create a [`Client`].
pub struct ClientBuilder {
  base_url: String,
  http_client: Option<reqwest::Client>,
  timeout: Option<Duration>,
}

impl ClientBuilder {
  pub fn new() -> Self {
    ClientBuilder {
      base_url: ZEROSSL_BASE_URL.to_string(),
      http_client: None,
      timeout: None,
    }
  }

  /// Override the API endpoint. Used to point the client at a
  /// staging or mock server.
  pub fn base_url(&mut self, base_url: String) -> &mut Self {
    self.base_url = base_url;
    self
  }

  /// Use a pre-configured [`reqwest::Client`] instead of building one.
  pub fn http_client(&mut self, http_client: reqwest::Client) -> &mut Self {
    self.http_client = Some(http_client);
    self
  }

  /// Fail an in-flight credential fetch after this duration with a
  /// transport error. Ignored if an explicit HTTP client is supplied.
  pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
    self.timeout = Some(timeout);
    self
  }

  pub fn build(&mut self) -> Result<Client, Error> {
    let http_client = match self.http_client.clone() {
      Some(http_client) => http_client,
      None => {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
          builder = builder.timeout(timeout);
        }
        builder.build()?
      }
    };

    Ok(Client {
      base_url: self.base_url.trim_end_matches('/').to_string(),
      http_client,
    })
  }
}

impl Default for ClientBuilder {
  fn default() -> Self {
    ClientBuilder::new()
  }
}

/// A freshly issued key-identifier / HMAC-secret pair.
///
/// Both halves always come from the same round trip to the
/// authority; there is no way to obtain one without the other.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EabCredentialPair {
  /// Key identifier, in string form.
  pub kid: String,
  /// HMAC secret, base64url encoded as received from the wire.
  pub hmac_key: String,
}

#[derive(Deserialize, Debug, Default)]
struct EabCredentialResponse {
  #[serde(default)]
  success: bool,
  #[serde(default, rename = "eab_kid")]
  kid: String,
  #[serde(default, rename = "eab_hmac_key")]
  hmac_key: String,
  #[serde(default)]
  error: EabCredentialError,
}

#[derive(Deserialize, Debug, Default)]
struct EabCredentialError {
  #[serde(default)]
  code: i64,
  #[serde(default, rename = "type")]
  typ: String,
}

/// A client for the ZeroSSL EAB credential endpoint.
///
/// This resource should be created through a [`ClientBuilder`].
#[derive(Debug, Clone)]
pub struct Client {
  base_url: String,
  http_client: reqwest::Client,
}

impl Client {
  /// Request a fresh EAB credential pair from the remote authority.
  ///
  /// This performs exactly one `POST {base_url}/acme/eab-credentials`
  /// round trip with the access key as a query parameter and no body.
  /// No retries are attempted; every failure is terminal for the call.
  ///
  /// The authority reports application-level failures inside a 200
  /// response: any body with `error.code != 0` is an [`Error::Api`]
  /// even though the HTTP exchange itself succeeded. A zero error code
  /// is treated as success regardless of the body's `success` flag.
  #[instrument(level = Level::INFO, name = "zerossl_eab::Client::fetch_credentials", err, skip(self, access_key), fields(base_url = %self.base_url))]
  pub async fn fetch_credentials(
    &self,
    access_key: &str,
  ) -> Result<EabCredentialPair, Error> {
    if access_key.is_empty() {
      return Err(Error::Validation("access key must not be empty"));
    }

    let url = format!("{}/acme/eab-credentials", self.base_url);
    let resp = self
      .http_client
      .post(&url)
      .query(&[("access_key", access_key)])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::HttpStatus {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
      });
    }

    let body = resp.text().await?;
    let body: EabCredentialResponse = serde_json::from_str(&body)?;

    debug!(success = body.success, "decoded EAB credential response");

    if body.error.code != 0 {
      return Err(Error::Api {
        typ: body.error.typ,
        code: body.error.code,
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("").to_string(),
      });
    }

    Ok(EabCredentialPair {
      kid: body.kid,
      hmac_key: body.hmac_key,
    })
  }
}
