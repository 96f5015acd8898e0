//! Plugin API trait for credential verification strategies.
//!
//! Plugins implement this trait to turn a presented credential into an
//! identity (password check, token validation, IP allow-list, ...). The
//! `Authenticator` delegates to it and owns everything else.

use async_trait::async_trait;
use warden_identity::{Credential, Identity};

use crate::error::AuthNError;

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Create the credential instance this strategy expects to be filled.
    ///
    /// Strategies that need pre-populated defaults (a fixed realm, for
    /// example) override this.
    fn new_credential(&self) -> Credential {
        Credential::default()
    }

    /// Verify a credential and return the fulfilled identity it proves.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailure` if the credential is invalid; strategies must
    ///   fail rather than return an unfulfilled identity
    /// - `StoreUnavailable` if a backend the strategy consults is down
    /// - `Internal` for unexpected errors
    async fn verify(&self, credential: &Credential) -> Result<Identity, AuthNError>;
}
