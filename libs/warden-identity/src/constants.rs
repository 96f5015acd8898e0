//! Well-known claim names and storage keys.

use uuid::{Uuid, uuid};

/// Fixed key under which a signed-in identity is stored.
///
/// Also the prefix of every realm namespace (`IDENTITY_<realm>`).
pub const IDENTITY_STORAGE_KEY: &str = "IDENTITY";

/// Claim that must be present and non-empty for an identity to be fulfilled.
pub const ID_CLAIM: &str = "id";

/// Subject's home tenant.
pub const TENANT_ID_CLAIM: &str = "tenant_id";

/// Capability scopes granted to the subject. `["*"]` means unrestricted.
pub const SCOPES_CLAIM: &str = "scopes";

/// Subject used by development verifiers when no identity is configured.
pub const DEFAULT_SUBJECT_ID: Uuid = uuid!("11111111-6a88-4768-9dfc-6bcd5187d9ed");

/// Tenant used by development verifiers when no identity is configured.
pub const DEFAULT_TENANT_ID: Uuid = uuid!("00000000-df51-5b42-9538-d2b56b7ee953");

/// Builds the store namespace owned by `realm`.
///
/// Deterministic: the same realm always maps to the same namespace and two
/// distinct realms never share one.
#[must_use]
pub fn realm_namespace(realm: &str) -> String {
    format!("{IDENTITY_STORAGE_KEY}_{realm}")
}
