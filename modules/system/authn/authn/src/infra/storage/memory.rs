//! Process-local session store.

use std::collections::HashMap;

use async_trait::async_trait;
use authn_sdk::{AuthNError, SessionStore};
use parking_lot::RwLock;

/// In-memory [`SessionStore`] keyed by namespace, then by key.
///
/// Every call takes the lock once, so single operations are atomic and a
/// write is visible to the next read in the same process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    namespaces: RwLock<HashMap<String, HashMap<String, Vec<u8>>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no namespace holds any data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.read().values().all(HashMap::is_empty)
    }

    #[must_use]
    pub fn contains_namespace(&self, namespace: &str) -> bool {
        self.namespaces.read().contains_key(namespace)
    }

    /// Keys currently stored in `namespace`, sorted.
    #[must_use]
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let guard = self.namespaces.read();
        let mut keys: Vec<String> = guard
            .get(namespace)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn has(&self, namespace: &str, key: &str) -> Result<bool, AuthNError> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .is_some_and(|entries| entries.contains_key(key)))
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, AuthNError> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<(), AuthNError> {
        self.namespaces
            .write()
            .entry(namespace.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn destroy(&self, namespace: &str) -> Result<(), AuthNError> {
        self.namespaces.write().remove(namespace);
        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let store = InMemorySessionStore::new();

        store.set("ns", "k", b"v".to_vec()).await.unwrap();

        assert!(store.has("ns", "k").await.unwrap());
        assert_eq!(store.get("ns", "k").await.unwrap(), Some(b"v".to_vec()));
        assert!(!store.has("ns", "other").await.unwrap());
        assert!(!store.has("other", "k").await.unwrap());
    }

    #[tokio::test]
    async fn destroy_drops_every_key_in_namespace_only() {
        let store = InMemorySessionStore::new();
        store.set("a", "k1", vec![1]).await.unwrap();
        store.set("a", "k2", vec![2]).await.unwrap();
        store.set("b", "k1", vec![3]).await.unwrap();

        store.destroy("a").await.unwrap();

        assert!(!store.contains_namespace("a"));
        assert_eq!(store.keys("b"), vec!["k1".to_owned()]);
    }

    #[tokio::test]
    async fn destroy_missing_namespace_is_noop() {
        let store = InMemorySessionStore::new();

        store.destroy("missing").await.unwrap();

        assert!(store.is_empty());
    }
}
