use crate::client::Client;
use crate::error::Error;
use data_encoding::BASE64URL_NOPAD;
use openssl::pkey::PKey;
use openssl::pkey::Private;
use serde::Deserialize;
use serde::Serialize;
use tracing::instrument;
use tracing::Level;
use uuid::Uuid;

/// A managed EAB credential record.
///
/// The record follows a declarative-resource lifecycle: [`create`]
/// assigns an identifier and fetches credentials, [`read`] returns the
/// stored values without touching the network, [`update`] replaces the
/// credential pair wholesale, and [`delete`] drops local tracking (the
/// authority exposes no revocation call, so nothing happens remotely).
///
/// Serializes for state storage by a surrounding orchestrator; note
/// that `api_key`, `kid` and `hmac_key` are sensitive and the stored
/// form contains them in the clear.
///
/// [`create`]: EabCredentials::create
/// [`read`]: EabCredentials::read
/// [`update`]: EabCredentials::update
/// [`delete`]: EabCredentials::delete
#[derive(Deserialize, Serialize, Clone)]
pub struct EabCredentials {
  pub(crate) id: Option<String>,
  pub(crate) api_key: String,
  pub(crate) kid: Option<String>,
  pub(crate) hmac_key: Option<String>,
}

impl EabCredentials {
  /// Declare a new, not yet created record for the given ZeroSSL
  /// access key.
  pub fn new(api_key: String) -> Self {
    EabCredentials {
      id: None,
      api_key,
      kid: None,
      hmac_key: None,
    }
  }

  /// Adopt an already tracked record by its identifier alone.
  ///
  /// No remote lookup happens; the record has no credential values
  /// until a later [`EabCredentials::update`] fetches them.
  pub fn import(id: String, api_key: String) -> Result<Self, Error> {
    if id.is_empty() {
      return Err(Error::Validation("import identifier must not be empty"));
    }

    Ok(EabCredentials {
      id: Some(id),
      api_key,
      kid: None,
      hmac_key: None,
    })
  }

  /// The locally generated identifier, if one has been assigned.
  /// Opaque to the remote system; exists only for resource tracking.
  pub fn id(&self) -> Option<&str> {
    self.id.as_deref()
  }

  /// The key identifier half of the credential pair. Sensitive.
  pub fn kid(&self) -> Option<&str> {
    self.kid.as_deref()
  }

  /// The base64url-encoded HMAC secret half of the credential pair.
  /// Sensitive.
  pub fn hmac_key(&self) -> Option<&str> {
    self.hmac_key.as_deref()
  }

  /// Assign a fresh random identifier if the record has none yet.
  /// Once assigned, the identifier never changes.
  pub fn ensure_id(&mut self) {
    if self.id.is_none() {
      self.id = Some(Uuid::new_v4().to_string());
    }
  }

  /// Create the record: assign an identifier and fetch a credential
  /// pair from the authority.
  ///
  /// On failure the credential fields are left exactly as they were;
  /// no partial record is ever produced.
  #[instrument(level = Level::INFO, name = "zerossl_eab::EabCredentials::create", err, skip(self, client), fields(id = tracing::field::Empty))]
  pub async fn create(&mut self, client: &Client) -> Result<(), Error> {
    self.ensure_id();
    tracing::Span::current()
      .record("id", &tracing::field::display(self.id.as_deref().unwrap_or("")));

    let pair = client.fetch_credentials(&self.api_key).await?;
    self.kid = Some(pair.kid);
    self.hmac_key = Some(pair.hmac_key);
    Ok(())
  }

  /// Return the stored state unchanged. Never performs network I/O.
  pub fn read(&self) -> EabCredentials {
    self.clone()
  }

  /// Replace the credential pair with freshly fetched values. The
  /// identifier is untouched; there is no update-in-place concept.
  ///
  /// On failure the previous `kid`/`hmac_key` remain in place.
  #[instrument(level = Level::INFO, name = "zerossl_eab::EabCredentials::update", err, skip(self, client), fields(id = ?self.id))]
  pub async fn update(&mut self, client: &Client) -> Result<(), Error> {
    let pair = client.fetch_credentials(&self.api_key).await?;
    self.kid = Some(pair.kid);
    self.hmac_key = Some(pair.hmac_key);
    Ok(())
  }

  /// Drop local tracking. The authority has no revocation call, so
  /// this never performs network I/O and cannot fail.
  pub fn delete(&mut self) {
    self.id = None;
    self.kid = None;
    self.hmac_key = None;
  }

  /// Decode the stored HMAC secret into an HMAC [`PKey`], ready for
  /// signing an ACME `externalAccountBinding` JWS.
  pub fn hmac_pkey(&self) -> Result<PKey<Private>, Error> {
    let hmac_key = self.hmac_key.as_deref().ok_or(Error::Validation(
      "record has no HMAC key; fetch credentials first",
    ))?;
    let raw = BASE64URL_NOPAD.decode(hmac_key.as_bytes())?;
    Ok(PKey::hmac(&raw)?)
  }
}

impl std::fmt::Debug for EabCredentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // api_key, kid and hmac_key are secrets and must not reach logs.
    f.debug_struct("EabCredentials")
      .field("id", &self.id)
      .field("api_key", &"<redacted>")
      .field("kid", &self.kid.as_ref().map(|_| "<redacted>"))
      .field("hmac_key", &self.hmac_key.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}
