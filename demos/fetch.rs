use std::time::Duration;
use zerossl_eab::ClientBuilder;
use zerossl_eab::EabCredentials;
use zerossl_eab::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
  let api_key = std::env::args()
    .nth(1)
    .expect("usage: fetch <zerossl-api-key>");

  // Create a client for the production ZeroSSL API. The timeout
  // bounds the single credential round trip.
  let client = ClientBuilder::new()
    .timeout(Duration::from_secs(30))
    .build()?;

  // Declare a record and create it: this assigns a tracking
  // identifier and fetches a fresh kid/hmac_key pair.
  let mut record = EabCredentials::new(api_key);
  record.create(&client).await?;

  println!("id:       {}", record.id().unwrap());
  println!("kid:      {}", record.kid().unwrap());
  println!("hmac_key: {}", record.hmac_key().unwrap());

  // The pair can now be handed to an ACME client as the
  // externalAccountBinding for account registration. The HMAC
  // secret decodes into a signing key directly:
  let _pkey = record.hmac_pkey()?;

  Ok(())
}
