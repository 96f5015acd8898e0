//! Configuration for the `AuthN` module.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;

/// Environment variables with this prefix override file values.
pub const ENV_PREFIX: &str = "WARDEN_AUTHN_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(String),

    #[error("invalid configuration field '{field}': {message}")]
    Invalid { field: String, message: String },
}

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNConfig {
    /// Authentication domain of the identifier.
    ///
    /// Scopes the store namespace, so "admin" and "customer" sessions never
    /// collide in a shared store.
    pub realm: String,
}

impl Default for AuthNConfig {
    fn default() -> Self {
        Self {
            realm: "default".to_owned(),
        }
    }
}

impl AuthNConfig {
    /// Load from a YAML file, then apply `WARDEN_AUTHN_*` overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the sources cannot be parsed or the result
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Parse from an inline YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document cannot be parsed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::extract(Figment::new().merge(Yaml::string(yaml)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let cfg: Self = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the realm is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.realm.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "realm".to_owned(),
                message: "must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}
