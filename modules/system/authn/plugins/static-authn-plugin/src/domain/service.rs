//! Service implementation for the static `AuthN` plugin.

use std::collections::HashMap;

use argon2::{Argon2, PasswordVerifier};
use password_hash::PasswordHash;
use secrecy::ExposeSecret;
use warden_identity::{Credential, Identity};

use crate::config::{AuthNMode, StaticAuthNPluginConfig};

struct StaticUser {
    password_hash: String,
    realm: Option<String>,
    identity: Identity,
}

/// Static `AuthN` service.
///
/// Maps credentials to identities based on configuration mode:
/// - `accept_all`: Any non-empty token or username maps to the default identity
/// - `static_tokens`: Specific tokens map to specific identities
/// - `static_users`: Username and password checked against argon2 hashes
pub struct Service {
    mode: AuthNMode,
    default_identity: Identity,
    token_map: HashMap<String, Identity>,
    users: HashMap<String, StaticUser>,
}

impl Service {
    /// Create a service from plugin configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured password hash is not a valid PHC string.
    pub fn from_config(cfg: &StaticAuthNPluginConfig) -> anyhow::Result<Self> {
        if cfg.mode == AuthNMode::AcceptAll {
            tracing::warn!(
                "Static AuthN plugin is running in `accept_all` mode: \
                 every credential will be accepted with a hardcoded identity. \
                 Do NOT use this mode in production."
            );
        }

        let token_map: HashMap<String, Identity> = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), m.identity.to_identity()))
            .collect();

        let mut users = HashMap::with_capacity(cfg.users.len());
        for user in &cfg.users {
            PasswordHash::new(&user.password_hash).map_err(|e| {
                anyhow::anyhow!("invalid password hash for user '{}': {e}", user.username)
            })?;
            users.insert(
                user.username.clone(),
                StaticUser {
                    password_hash: user.password_hash.clone(),
                    realm: user.realm.clone(),
                    identity: user.identity.to_identity(),
                },
            );
        }

        tracing::info!(
            mode = ?cfg.mode,
            token_count = token_map.len(),
            user_count = users.len(),
            "Loaded static authn configuration"
        );

        Ok(Self {
            mode: cfg.mode.clone(),
            default_identity: cfg.default_identity.to_identity(),
            token_map,
            users,
        })
    }

    /// Authenticate a credential and return the identity.
    ///
    /// Returns `None` if the credential is empty, unknown, or does not match.
    #[must_use]
    pub fn authenticate(&self, credential: &Credential) -> Option<Identity> {
        let identity = match &self.mode {
            AuthNMode::AcceptAll => {
                let has_token = non_empty(credential.token().map(|s| s.expose_secret()));
                let has_username = non_empty(credential.username());
                if !has_token && !has_username {
                    return None;
                }
                &self.default_identity
            }
            AuthNMode::StaticTokens => {
                let token = credential.token().map(|s| s.expose_secret())?;
                if token.is_empty() {
                    return None;
                }
                self.token_map.get(token)?
            }
            AuthNMode::StaticUsers => self.authenticate_user(credential)?,
        };

        Some(identity.clone())
    }

    fn authenticate_user(&self, credential: &Credential) -> Option<&Identity> {
        let username = credential.username()?;
        let password = credential.password().map(|s| s.expose_secret())?;
        let user = self.users.get(username)?;

        if let Some(realm) = &user.realm
            && credential.realm() != Some(realm.as_str())
        {
            tracing::debug!(username, realm = %realm, "credential realm does not match user realm");
            return None;
        }

        let parsed = PasswordHash::new(&user.password_hash).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()?;

        Some(&user.identity)
    }
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
