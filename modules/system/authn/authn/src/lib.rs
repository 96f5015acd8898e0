//! `AuthN` Module
//!
//! Signs subjects in and recognizes them on later requests:
//!
//! - [`Authenticator`] runs a [`CredentialVerifier`](authn_sdk::CredentialVerifier)
//!   and attaches the resulting identity to an [`Identifier`]
//! - [`Identifier`] persists the identity into a realm-scoped namespace of a
//!   [`SessionStore`](authn_sdk::SessionStore) and recognizes it later
//! - [`InMemorySessionStore`] is the process-local store
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{AuthNConfig, ConfigError};
pub use domain::{Authenticator, Identifier, IdentifierFactory, RealmStorage};
pub use infra::storage::InMemorySessionStore;
