//! `AuthN` SDK
//!
//! This crate provides the public contract of the `authn` module:
//!
//! - [`SessionStore`] - Backing store an `Identifier` persists identities into
//! - [`CredentialVerifier`] - Verification strategy implemented by plugins
//! - [`IdentifierState`] - Recognition state of an `Identifier`
//! - [`AuthNError`] - Error types
//!
//! ## Usage
//!
//! Plugins implement the verifier; hosts supply a store:
//!
//! ```ignore
//! use authn_sdk::{AuthNError, CredentialVerifier};
//! use warden_identity::{Credential, Identity};
//!
//! struct IpAllowList(Vec<std::net::IpAddr>);
//!
//! #[async_trait::async_trait]
//! impl CredentialVerifier for IpAllowList {
//!     async fn verify(&self, credential: &Credential) -> Result<Identity, AuthNError> {
//!         match credential.ip() {
//!             Some(ip) if self.0.contains(&ip) => Ok(Identity::builder().id(ip.to_string()).build()),
//!             _ => Err(AuthNError::authentication_failure("address not allowed")),
//!         }
//!     }
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::SessionStore;
pub use error::AuthNError;
pub use models::IdentifierState;
pub use plugin_api::CredentialVerifier;
