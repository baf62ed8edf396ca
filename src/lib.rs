//! Issue and manage ZeroSSL External Account Binding (EAB)
//! credentials for ACME account registration.
//!
//! An [`EabCredentials`] record holds a locally generated identifier,
//! the caller's ZeroSSL access key, and the `kid`/`hmac_key` pair
//! fetched from the authority. The record follows a declarative
//! Create / Read / Update / Delete lifecycle; the only network
//! interaction is a single synchronous round trip performed by
//! [`Client::fetch_credentials`].

mod client;
mod credentials;
mod error;
mod schema;

pub use client::*;
pub use credentials::*;
pub use error::Error;
pub use schema::*;
