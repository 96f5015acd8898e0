//! A session store bound to one realm namespace.

use std::fmt;
use std::sync::Arc;

use authn_sdk::{AuthNError, SessionStore};
use warden_identity::constants::realm_namespace;

/// Handle over a [`SessionStore`] that only ever touches one namespace.
#[derive(Clone)]
pub struct RealmStorage {
    store: Arc<dyn SessionStore>,
    namespace: String,
}

impl RealmStorage {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, realm: &str) -> Self {
        Self {
            store,
            namespace: realm_namespace(realm),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be reached.
    pub async fn has(&self, key: &str) -> Result<bool, AuthNError> {
        self.store
            .has(&self.namespace, key)
            .await
            .inspect_err(|e| self.log_failure("has", e))
    }

    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be reached.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AuthNError> {
        self.store
            .get(&self.namespace, key)
            .await
            .inspect_err(|e| self.log_failure("get", e))
    }

    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be reached.
    pub async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), AuthNError> {
        self.store
            .set(&self.namespace, key, value)
            .await
            .inspect_err(|e| self.log_failure("set", e))
    }

    /// Drop the whole namespace, not only the identity key.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be reached.
    pub async fn destroy(&self) -> Result<(), AuthNError> {
        self.store
            .destroy(&self.namespace)
            .await
            .inspect_err(|e| self.log_failure("destroy", e))
    }

    pub(crate) fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    fn log_failure(&self, op: &str, e: &AuthNError) {
        tracing::error!(operation = op, namespace = %self.namespace, error = %e, "session store call failed");
    }
}

impl fmt::Debug for RealmStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealmStorage")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
