use crate::credentials::EabCredentials;
use crate::error::Error;

/// How an attribute's value enters a record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AttributeMode {
  /// Supplied by the caller when the record is declared.
  Input,
  /// Produced by this manager or by the remote authority.
  Computed,
}

/// One attribute of the record schema exposed to the
/// declarative-config layer.
#[derive(Debug, Clone, Copy)]
pub struct Attribute {
  pub name: &'static str,
  pub mode: AttributeMode,
  pub sensitive: bool,
  pub required: bool,
}

/// The explicit attribute table for [`EabCredentials`]. This replaces
/// the reflection-style field binding a host framework would perform.
pub const ATTRIBUTES: [Attribute; 4] = [
  Attribute {
    name: "id",
    mode: AttributeMode::Computed,
    sensitive: false,
    required: false,
  },
  Attribute {
    name: "api_key",
    mode: AttributeMode::Input,
    sensitive: false,
    required: true,
  },
  Attribute {
    name: "kid",
    mode: AttributeMode::Computed,
    sensitive: true,
    required: false,
  },
  Attribute {
    name: "hmac_key",
    mode: AttributeMode::Computed,
    sensitive: true,
    required: false,
  },
];

/// Check a record against [`ATTRIBUTES`] before any lifecycle
/// operation runs: required inputs must be present, computed values
/// may only appear on a tracked record, and the credential pair is
/// all-or-nothing.
pub fn validate_record(record: &EabCredentials) -> Result<(), Error> {
  if record.api_key.is_empty() {
    return Err(Error::Validation("required attribute api_key is not set"));
  }

  let has_credentials = record.kid.is_some() || record.hmac_key.is_some();
  if record.id.is_none() && has_credentials {
    return Err(Error::Validation(
      "computed attributes present on an untracked record",
    ));
  }

  if record.kid.is_some() != record.hmac_key.is_some() {
    return Err(Error::Validation(
      "kid and hmac_key must be set together or not at all",
    ));
  }

  Ok(())
}
