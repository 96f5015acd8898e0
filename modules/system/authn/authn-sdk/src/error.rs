//! Error types for the `authn` module.

use thiserror::Error;
use warden_identity::{CredentialError, IdentityDecodeError, IdentityEncodeError};

/// Errors that can occur while authenticating or recognizing an identity.
#[derive(Debug, Error)]
pub enum AuthNError {
    /// The verification strategy rejected the credential or produced no
    /// fulfilled identity.
    #[error("authentication failure: {0}")]
    AuthenticationFailure(String),

    /// A credential field failed validation while being loaded.
    #[error("invalid credential field '{field}': {message}")]
    InvalidCredential { field: String, message: String },

    /// The identifier is not in a state that allows the operation.
    #[error("invalid session state: {0}")]
    InvalidSessionState(String),

    /// The backing store could not be read or written.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored bytes could not be decoded back into an identity.
    #[error("deserialization failure: {0}")]
    DeserializationFailure(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthNError {
    #[must_use]
    pub fn authentication_failure(message: impl Into<String>) -> Self {
        Self::AuthenticationFailure(message.into())
    }

    #[must_use]
    pub fn invalid_session_state(message: impl Into<String>) -> Self {
        Self::InvalidSessionState(message.into())
    }

    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<CredentialError> for AuthNError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::InvalidField { field, message } => {
                Self::InvalidCredential { field, message }
            }
        }
    }
}

impl From<IdentityEncodeError> for AuthNError {
    fn from(e: IdentityEncodeError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<IdentityDecodeError> for AuthNError {
    fn from(e: IdentityDecodeError) -> Self {
        Self::DeserializationFailure(e.to_string())
    }
}
