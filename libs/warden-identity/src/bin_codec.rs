//! Versioned binary encoding of an [`Identity`] for session stores.
//!
//! Layout: one version byte followed by the `postcard` encoding of the claim map.

use crate::identity::{Claims, Identity};

pub const IDENTITY_BIN_VERSION: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum IdentityEncodeError {
    #[error("failed to encode identity payload: {0}")]
    Payload(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityDecodeError {
    #[error("empty identity payload")]
    Empty,

    #[error("unsupported identity payload version {0}")]
    UnsupportedVersion(u8),

    #[error("failed to decode identity payload: {0}")]
    Payload(String),
}

/// Encode an identity into its stored form.
///
/// # Errors
///
/// Returns `IdentityEncodeError::Payload` if the claims cannot be serialized.
pub fn encode_bin(identity: &Identity) -> Result<Vec<u8>, IdentityEncodeError> {
    let payload = postcard::to_allocvec(identity.claims())
        .map_err(|e| IdentityEncodeError::Payload(e.to_string()))?;

    let mut out = Vec::with_capacity(payload.len() + 1);
    out.push(IDENTITY_BIN_VERSION);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a stored payload into a fresh identity.
///
/// # Errors
///
/// Returns an error for an empty payload, an unknown version byte, or bytes
/// that are not a valid claim map.
pub fn decode_bin(bytes: &[u8]) -> Result<Identity, IdentityDecodeError> {
    let (version, payload) = bytes.split_first().ok_or(IdentityDecodeError::Empty)?;
    if *version != IDENTITY_BIN_VERSION {
        return Err(IdentityDecodeError::UnsupportedVersion(*version));
    }

    let claims: Claims =
        postcard::from_bytes(payload).map_err(|e| IdentityDecodeError::Payload(e.to_string()))?;

    let mut identity = Identity::new();
    identity.import(claims);
    Ok(identity)
}
