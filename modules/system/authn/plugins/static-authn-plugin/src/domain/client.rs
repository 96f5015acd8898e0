//! `CredentialVerifier` implementation for the static `AuthN` plugin.

use async_trait::async_trait;
use authn_sdk::{AuthNError, CredentialVerifier};
use warden_identity::{Credential, Identity};

use super::service::Service;

#[async_trait]
impl CredentialVerifier for Service {
    async fn verify(&self, credential: &Credential) -> Result<Identity, AuthNError> {
        self.authenticate(credential)
            .ok_or_else(|| AuthNError::authentication_failure("invalid credential"))
    }
}
