//! Domain models for the `authn` module.

use std::fmt;

use serde::Serialize;

/// Recognition state of an `Identifier`.
///
/// ```text
/// Unrecognized --set_identity--> BoundUnpersisted --sign_in--> SignedIn
///       any state --sign_out--> SignedOut --set_identity--> BoundUnpersisted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierState {
    /// Nothing bound in memory and nothing known to be stored.
    #[default]
    Unrecognized,
    /// An identity is attached in memory but not yet written to the store.
    BoundUnpersisted,
    /// The identity is persisted under the realm-scoped key.
    SignedIn,
    /// The realm namespace was destroyed and the identity cleared.
    SignedOut,
}

impl fmt::Display for IdentifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unrecognized => "unrecognized",
            Self::BoundUnpersisted => "bound_unpersisted",
            Self::SignedIn => "signed_in",
            Self::SignedOut => "signed_out",
        })
    }
}
