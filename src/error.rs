#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A local precondition on the record or its inputs did not hold.
  #[error("validation error: {0}")]
  Validation(&'static str),

  /// The request could not be built or sent, including timeouts and
  /// cancellation of the in-flight call.
  #[error("could not request EAB credentials: {0}")]
  Transport(#[from] reqwest::Error),

  /// The remote authority answered with a non-2xx status.
  #[error("getting EAB credentials failed with HTTP status code {status} {reason}")]
  HttpStatus { status: u16, reason: String },

  /// The response body was not the expected JSON document.
  #[error("could not decode response: {0}")]
  Decode(#[from] serde_json::Error),

  /// The remote authority signaled failure inside a 2xx response body.
  #[error("could not get EAB credentials; server responded with error type {typ}, error code {code} and HTTP status code {status} {reason}")]
  Api {
    typ: String,
    code: i64,
    status: u16,
    reason: String,
  },

  #[error(transparent)]
  Other(Box<dyn std::error::Error + Send + Sync>),
}

impl From<openssl::error::ErrorStack> for Error {
  fn from(err: openssl::error::ErrorStack) -> Self {
    Self::Other(Box::new(err))
  }
}

impl From<data_encoding::DecodeError> for Error {
  fn from(err: data_encoding::DecodeError) -> Self {
    Self::Other(Box::new(err))
  }
}
