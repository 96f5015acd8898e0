//! Backing store contract for identifiers.
//!
//! A store is partitioned into namespaces. Each `Identifier` owns exactly one
//! namespace, derived from its realm, and writes its identity under a fixed
//! key inside it.

use async_trait::async_trait;

use crate::error::AuthNError;

/// Namespaced key-value store backing signed-in identities.
///
/// Implementations must make each single call atomic for its key or
/// namespace. Nothing stronger is assumed: concurrent sign-ins into the same
/// namespace resolve last-writer-wins.
///
/// ```ignore
/// let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
/// store.set("IDENTITY_admin", "IDENTITY", bytes).await?;
/// assert!(store.has("IDENTITY_admin", "IDENTITY").await?);
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Whether `key` currently has a value in `namespace`.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` if the store cannot be reached
    async fn has(&self, namespace: &str, key: &str) -> Result<bool, AuthNError>;

    /// Read the raw value stored at `key` in `namespace`.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` if the store cannot be reached
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, AuthNError>;

    /// Write a raw value at `key` in `namespace`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` if the store cannot be reached
    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<(), AuthNError>;

    /// Drop the whole namespace with every key in it.
    ///
    /// Destroying a namespace that does not exist is not an error.
    ///
    /// # Errors
    ///
    /// - `StoreUnavailable` if the store cannot be reached
    async fn destroy(&self, namespace: &str) -> Result<(), AuthNError>;
}
