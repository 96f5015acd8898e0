//! Configuration for the static `AuthN` plugin.

use std::collections::BTreeMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use uuid::Uuid;

use warden_identity::Identity;
use warden_identity::constants::{DEFAULT_SUBJECT_ID, DEFAULT_TENANT_ID};

/// Environment variables with this prefix override file values.
pub const ENV_PREFIX: &str = "WARDEN_STATIC_AUTHN_";

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthNPluginConfig {
    /// Authentication mode.
    pub mode: AuthNMode,

    /// Default identity returned in `accept_all` mode.
    pub default_identity: IdentityConfig,

    /// Static token-to-identity mappings for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,

    /// Static users for `static_users` mode.
    pub users: Vec<UserMapping>,
}

impl Default for StaticAuthNPluginConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::AcceptAll,
            default_identity: IdentityConfig::default(),
            tokens: Vec::new(),
            users: Vec::new(),
        }
    }
}

impl StaticAuthNPluginConfig {
    /// Load from a YAML file, then apply `WARDEN_STATIC_AUTHN_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the sources cannot be parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?)
    }

    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(Figment::new().merge(Yaml::string(yaml)).extract()?)
    }
}

/// Authentication mode.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Accept any non-empty token or username and return the default identity.
    #[default]
    AcceptAll,
    /// Map specific tokens to specific identities.
    StaticTokens,
    /// Check username and password against configured hashes.
    StaticUsers,
}

/// Identity configuration for a subject.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityConfig {
    /// Subject ID (user/service). Must be non-empty for the identity to be fulfilled.
    pub id: String,

    /// Subject's home tenant.
    pub tenant_id: Uuid,

    /// Scopes. `["*"]` means first-party / unrestricted.
    pub scopes: Vec<String>,

    /// Additional string claims.
    pub claims: BTreeMap<String, String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_SUBJECT_ID.to_string(),
            tenant_id: DEFAULT_TENANT_ID,
            scopes: vec!["*".to_owned()],
            claims: BTreeMap::new(),
        }
    }
}

impl IdentityConfig {
    #[must_use]
    pub fn to_identity(&self) -> Identity {
        let mut identity = Identity::builder()
            .tenant_id(self.tenant_id)
            .scopes(self.scopes.clone())
            .build();
        identity.import(self.claims.clone());
        // Set last so extra claims cannot override the subject.
        identity.import([(warden_identity::constants::ID_CLAIM, self.id.as_str())]);
        identity
    }
}

/// Maps a static token to a specific identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The token value to match.
    pub token: String,
    /// The identity to return when this token is presented.
    pub identity: IdentityConfig,
}

/// A user accepted in `static_users` mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserMapping {
    pub username: String,
    /// Argon2 password hash in PHC string format.
    pub password_hash: String,
    /// If set, the credential must carry this realm.
    #[serde(default)]
    pub realm: Option<String>,
    pub identity: IdentityConfig,
}
