#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static `AuthN` Plugin
//!
//! Credential verifier backed by static mappings, for development and testing.
//!
//! ## Modes
//!
//! - **`accept_all`** (default): Accepts any credential carrying a non-empty token
//!   or username and returns the configured default identity.
//!
//! - **`static_tokens`**: Maps specific tokens to specific identities.
//!
//! - **`static_users`**: Checks a username and password against argon2 PHC hashes,
//!   optionally restricted to one realm.
//!
//! ## Configuration
//!
//! ```yaml
//! mode: static_users
//! users:
//!   - username: "payam"
//!     password_hash: "$argon2id$v=19$m=19456,t=2,p=1$..."
//!     realm: "admin"
//!     identity:
//!       id: "payam"
//!       tenant_id: "00000000-df51-5b42-9538-d2b56b7ee953"
//!       scopes: ["*"]
//! ```

pub mod config;
pub mod domain;

pub use config::StaticAuthNPluginConfig;
pub use domain::Service;
