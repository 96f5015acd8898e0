#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod bin_codec;
pub mod constants;
pub mod credential;
pub mod identity;

pub use credential::{Credential, CredentialError};
pub use identity::{ClaimValue, Claims, Identity, IdentityBuilder};

pub use bin_codec::{
    IDENTITY_BIN_VERSION, IdentityDecodeError, IdentityEncodeError, decode_bin, encode_bin,
};
