use anyhow::Result;
use mockito::Matcher;
use mockito::Server;
use mockito::ServerGuard;
use zerossl_eab::validate_record;
use zerossl_eab::Client;
use zerossl_eab::ClientBuilder;
use zerossl_eab::EabCredentials;

fn mock_client(server: &ServerGuard) -> Result<Client> {
  let client = ClientBuilder::new().base_url(server.url()).build()?;
  Ok(client)
}

fn credential_body(kid: &str, hmac_key: &str) -> String {
  format!(
    r#"{{"success":true,"eab_kid":"{}","eab_hmac_key":"{}"}}"#,
    kid, hmac_key
  )
}

#[tokio::test]
async fn test_create_then_read_without_network() -> Result<()> {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::UrlEncoded("access_key".into(), "key-1".into()))
    .with_status(200)
    .with_body(credential_body("kid-1", "aG1hYy0x"))
    .expect(1)
    .create_async()
    .await;

  let client = mock_client(&server)?;
  let mut record = EabCredentials::new("key-1".to_string());
  validate_record(&record)?;

  record.create(&client).await?;
  validate_record(&record)?;

  let id = record.id().unwrap().to_string();
  assert!(!id.is_empty());
  assert_eq!(record.kid(), Some("kid-1"));
  assert_eq!(record.hmac_key(), Some("aG1hYy0x"));

  // Read copies the stored state through unchanged, with zero
  // network calls.
  let read = record.read();
  assert_eq!(read.id(), Some(id.as_str()));
  assert_eq!(read.kid(), Some("kid-1"));
  assert_eq!(read.hmac_key(), Some("aG1hYy0x"));

  mock.assert_async().await;
  Ok(())
}

#[tokio::test]
async fn test_update_replaces_credentials_keeps_id() -> Result<()> {
  let mut server = Server::new_async().await;
  let first = server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(credential_body("kid-old", "aG1hYy1vbGQ"))
    .expect(1)
    .create_async()
    .await;

  let client = mock_client(&server)?;
  let mut record = EabCredentials::new("key-1".to_string());
  record.create(&client).await?;
  let id = record.id().unwrap().to_string();
  first.assert_async().await;

  let second = server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(credential_body("kid-new", "aG1hYy1uZXc"))
    .expect(1)
    .create_async()
    .await;

  record.update(&client).await?;
  second.assert_async().await;

  assert_eq!(record.id(), Some(id.as_str()));
  assert_eq!(record.kid(), Some("kid-new"));
  assert_eq!(record.hmac_key(), Some("aG1hYy1uZXc"));
  Ok(())
}

#[tokio::test]
async fn test_failed_create_leaves_record_untouched() -> Result<()> {
  let mut server = Server::new_async().await;
  server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(r#"{"success":false,"error":{"code":101,"type":"invalid_access_key"}}"#)
    .create_async()
    .await;

  let client = mock_client(&server)?;
  let mut record = EabCredentials::new("bad-key".to_string());

  let err = record.create(&client).await.err().unwrap();
  assert!(matches!(err, zerossl_eab::Error::Api { code: 101, .. }));

  // The identifier was assigned but no partial credential survives.
  assert!(record.kid().is_none());
  assert!(record.hmac_key().is_none());
  Ok(())
}

#[tokio::test]
async fn test_failed_update_keeps_previous_credentials() -> Result<()> {
  let mut server = Server::new_async().await;
  let first = server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body(credential_body("kid-old", "aG1hYy1vbGQ"))
    .expect(1)
    .create_async()
    .await;

  let client = mock_client(&server)?;
  let mut record = EabCredentials::new("key-1".to_string());
  record.create(&client).await?;
  first.assert_async().await;

  server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::Any)
    .with_status(500)
    .create_async()
    .await;

  let err = record.update(&client).await.err().unwrap();
  assert!(matches!(
    err,
    zerossl_eab::Error::HttpStatus { status: 500, .. }
  ));

  assert_eq!(record.kid(), Some("kid-old"));
  assert_eq!(record.hmac_key(), Some("aG1hYy1vbGQ"));
  Ok(())
}

#[tokio::test]
async fn test_delete_is_local_and_infallible() -> Result<()> {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::Any)
    .expect(0)
    .create_async()
    .await;

  // Deleting an active record and a never-created record both
  // succeed without any network traffic.
  let mut record =
    EabCredentials::import("abc-123".to_string(), "key-1".to_string())?;
  record.delete();
  assert!(record.id().is_none());

  let mut record = EabCredentials::new("key-1".to_string());
  record.delete();
  assert!(record.id().is_none());

  mock.assert_async().await;
  Ok(())
}

#[tokio::test]
async fn test_imported_record_fetches_on_update() -> Result<()> {
  let mut server = Server::new_async().await;
  server
    .mock("POST", "/acme/eab-credentials")
    .match_query(Matcher::UrlEncoded("access_key".into(), "key-1".into()))
    .with_status(200)
    .with_body(credential_body("kid-1", "aG1hYy0x"))
    .create_async()
    .await;

  let client = mock_client(&server)?;
  let mut record =
    EabCredentials::import("abc-123".to_string(), "key-1".to_string())?;
  assert!(record.kid().is_none());

  record.update(&client).await?;
  assert_eq!(record.id(), Some("abc-123"));
  assert_eq!(record.kid(), Some("kid-1"));
  assert_eq!(record.hmac_key(), Some("aG1hYy0x"));
  Ok(())
}

#[test]
fn test_record_state_round_trips_through_serde() -> Result<()> {
  let record =
    EabCredentials::import("abc-123".to_string(), "key-1".to_string())?;
  let stored = serde_json::to_string(&record)?;
  let restored: EabCredentials = serde_json::from_str(&stored)?;
  assert_eq!(restored.id(), Some("abc-123"));
  assert!(restored.kid().is_none());
  Ok(())
}
