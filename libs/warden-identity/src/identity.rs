use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ID_CLAIM, SCOPES_CLAIM, TENANT_ID_CLAIM};

/// Claim set carried by an [`Identity`].
pub type Claims = BTreeMap<String, ClaimValue>;

/// A typed claim value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimValue {
    /// String value (user names, emails, opaque subject IDs).
    String(String),
    /// UUID value (subject and tenant IDs).
    Uuid(Uuid),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// List of strings (scopes, roles).
    List(Vec<String>),
}

impl ClaimValue {
    /// Whether the value carries something usable as a subject identifier.
    ///
    /// Empty strings, the nil UUID and empty lists are treated as absent.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::String(s) => !s.trim().is_empty(),
            Self::Uuid(u) => !u.is_nil(),
            Self::List(items) => !items.is_empty(),
            Self::Int(_) | Self::Bool(_) => true,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            Self::Uuid(_) | Self::Int(_) | Self::Bool(_) | Self::List(_) => None,
        }
    }

    /// Returns `Some` for `ClaimValue::Uuid`, and for strings holding a valid UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            Self::String(s) => Uuid::parse_str(s).ok(),
            Self::Int(_) | Self::Bool(_) | Self::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            Self::String(_) | Self::Uuid(_) | Self::Int(_) | Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for ClaimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Uuid> for ClaimValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ClaimValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// `Identity` represents "who" a request belongs to.
///
/// An identity is either the empty sentinel (no one) or fulfilled, meaning
/// it carries a non-empty [`ID_CLAIM`]. Fulfilment is always derived from
/// the current claims and never stored separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Claims", into = "Claims")]
pub struct Identity {
    claims: Claims,
}

impl Identity {
    /// Create the empty, unfulfilled identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> IdentityBuilder {
        IdentityBuilder::default()
    }

    /// Whether the minimum required claims are present and non-empty.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.claims.get(ID_CLAIM).is_some_and(ClaimValue::is_present)
    }

    /// Merge claims into this identity.
    ///
    /// Later entries override earlier ones and existing claims with the same
    /// name. Entries with an empty name are dropped. An empty input leaves the
    /// identity untouched, so an empty identity stays unfulfilled.
    pub fn import<I, K, V>(&mut self, claims: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ClaimValue>,
    {
        for (name, value) in claims {
            let name = name.into();
            if name.is_empty() {
                continue;
            }
            self.claims.insert(name, value.into());
        }
    }

    /// Merge the claims of another identity into this one.
    pub fn import_identity(&mut self, other: &Identity) {
        self.import(other.claims.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Reset to the empty, unfulfilled sentinel.
    pub fn clean(&mut self) {
        self.claims.clear();
    }

    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    #[must_use]
    pub fn into_claims(self) -> Claims {
        self.claims
    }

    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// The subject identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&ClaimValue> {
        self.claim(ID_CLAIM)
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.claim(TENANT_ID_CLAIM).and_then(ClaimValue::as_uuid)
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        self.claim(SCOPES_CLAIM)
            .and_then(ClaimValue::as_list)
            .unwrap_or_default()
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        let mut identity = Self::new();
        identity.import(claims);
        identity
    }
}

impl From<Identity> for Claims {
    fn from(identity: Identity) -> Self {
        identity.claims
    }
}

#[derive(Default)]
pub struct IdentityBuilder {
    claims: Claims,
}

impl IdentityBuilder {
    #[must_use]
    pub fn id(self, id: impl Into<ClaimValue>) -> Self {
        self.claim(ID_CLAIM, id)
    }

    #[must_use]
    pub fn tenant_id(self, tenant_id: Uuid) -> Self {
        self.claim(TENANT_ID_CLAIM, tenant_id)
    }

    #[must_use]
    pub fn scopes(self, scopes: Vec<String>) -> Self {
        self.claim(SCOPES_CLAIM, scopes)
    }

    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.claims.insert(name, value.into());
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Identity {
        Identity {
            claims: self.claims,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_identity_is_unfulfilled() {
        let identity = Identity::default();

        assert!(!identity.is_fulfilled());
        assert!(identity.claims().is_empty());
        assert!(identity.id().is_none());
    }

    #[test]
    fn identity_with_id_is_fulfilled() {
        let identity = Identity::builder().id("u1").build();

        assert!(identity.is_fulfilled());
        assert_eq!(identity.id(), Some(&ClaimValue::from("u1")));
    }

    #[test]
    fn blank_or_nil_id_is_not_fulfilled() {
        assert!(!Identity::builder().id("").build().is_fulfilled());
        assert!(!Identity::builder().id("   ").build().is_fulfilled());
        assert!(!Identity::builder().id(Uuid::nil()).build().is_fulfilled());
        assert!(!Identity::builder().id(Vec::<String>::new()).build().is_fulfilled());
    }

    #[test]
    fn claims_without_id_are_not_fulfilled() {
        let identity = Identity::builder()
            .claim("email", "someone@example.com")
            .build();

        assert!(!identity.is_fulfilled());
    }

    #[test]
    fn import_merges_and_overrides() {
        let mut identity = Identity::builder().id("u1").claim("role", "user").build();

        identity.import([("role", "admin"), ("email", "u1@example.com")]);

        assert_eq!(identity.id(), Some(&ClaimValue::from("u1")));
        assert_eq!(identity.claim("role"), Some(&ClaimValue::from("admin")));
        assert_eq!(
            identity.claim("email"),
            Some(&ClaimValue::from("u1@example.com"))
        );
    }

    #[test]
    fn import_of_nothing_keeps_identity_unfulfilled() {
        let mut identity = Identity::new();

        identity.import(Vec::<(String, ClaimValue)>::new());
        identity.import(None::<(String, ClaimValue)>);

        assert!(!identity.is_fulfilled());
        assert!(identity.claims().is_empty());
    }

    #[test]
    fn import_drops_empty_claim_names() {
        let mut identity = Identity::new();

        identity.import([("", "ignored"), ("id", "u1")]);

        assert_eq!(identity.claims().len(), 1);
        assert!(identity.is_fulfilled());
    }

    #[test]
    fn import_identity_copies_claims() {
        let source = Identity::builder()
            .id("u2")
            .scopes(vec!["read".to_owned()])
            .build();
        let mut target = Identity::new();

        target.import_identity(&source);

        assert_eq!(target, source);
    }

    #[test]
    fn clean_is_idempotent() {
        let mut identity = Identity::builder().id("u1").build();

        identity.clean();
        assert!(!identity.is_fulfilled());

        identity.clean();
        assert_eq!(identity, Identity::default());
    }

    #[test]
    fn typed_accessors() {
        let tenant = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap();
        let identity = Identity::builder()
            .id("u1")
            .tenant_id(tenant)
            .scopes(vec!["*".to_owned()])
            .build();

        assert_eq!(identity.tenant_id(), Some(tenant));
        assert_eq!(identity.scopes(), &["*"]);
    }

    #[test]
    fn scopes_default_to_empty() {
        let identity = Identity::builder().id("u1").build();

        assert!(identity.scopes().is_empty());
        assert!(identity.tenant_id().is_none());
    }

    #[test]
    fn string_claim_parses_as_uuid() {
        let value = ClaimValue::from("550e8400-e29b-41d4-a716-446655440001");

        assert!(value.as_uuid().is_some());
        assert!(ClaimValue::from("not-a-uuid").as_uuid().is_none());
    }

    #[test]
    fn identity_serializes_to_json() {
        let original = Identity::builder()
            .id("u1")
            .claim("admin", true)
            .claim("level", 3_i64)
            .build();

        let serialized = serde_json::to_string(&original).unwrap();
        let deserialized: Identity = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, original);
    }

    #[test]
    fn deserialization_drops_empty_claim_names() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":{"String":"u1"},"":{"String":"lost"}}"#).unwrap();

        assert_eq!(identity.claims().len(), 1);
        assert!(identity.claim("").is_none());
        assert_eq!(identity.id(), Some(&ClaimValue::from("u1")));
    }

    #[test]
    fn claim_value_display() {
        assert_eq!(ClaimValue::from("a").to_string(), "a");
        assert_eq!(ClaimValue::from(7_i64).to_string(), "7");
        assert_eq!(
            ClaimValue::from(vec!["a".to_owned(), "b".to_owned()]).to_string(),
            "[a, b]"
        );
    }
}
