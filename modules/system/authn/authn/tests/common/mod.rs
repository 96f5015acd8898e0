#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use authn::{Identifier, InMemorySessionStore};
use authn_sdk::{AuthNError, CredentialVerifier, SessionStore};
use parking_lot::Mutex;
use warden_identity::{Credential, Identity};

pub fn memory_store() -> Arc<InMemorySessionStore> {
    Arc::new(InMemorySessionStore::new())
}

pub fn identifier(realm: &str, store: &Arc<InMemorySessionStore>) -> Identifier {
    let store: Arc<dyn SessionStore> = store.clone();
    Identifier::new(realm, store)
}

pub fn user(id: &str) -> Identity {
    Identity::builder().id(id).build()
}

/// Store whose every call fails.
pub struct UnavailableStore;

#[async_trait]
impl SessionStore for UnavailableStore {
    async fn has(&self, _namespace: &str, _key: &str) -> Result<bool, AuthNError> {
        Err(AuthNError::store_unavailable("connection refused"))
    }

    async fn get(&self, _namespace: &str, _key: &str) -> Result<Option<Vec<u8>>, AuthNError> {
        Err(AuthNError::store_unavailable("connection refused"))
    }

    async fn set(&self, _namespace: &str, _key: &str, _value: Vec<u8>) -> Result<(), AuthNError> {
        Err(AuthNError::store_unavailable("connection refused"))
    }

    async fn destroy(&self, _namespace: &str) -> Result<(), AuthNError> {
        Err(AuthNError::store_unavailable("connection refused"))
    }
}

/// In-memory store whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyWriteStore {
    inner: InMemorySessionStore,
    fail_writes: AtomicBool,
}

impl FlakyWriteStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for FlakyWriteStore {
    async fn has(&self, namespace: &str, key: &str) -> Result<bool, AuthNError> {
        self.inner.has(namespace, key).await
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, AuthNError> {
        self.inner.get(namespace, key).await
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<(), AuthNError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthNError::store_unavailable("write rejected"));
        }
        self.inner.set(namespace, key, value).await
    }

    async fn destroy(&self, namespace: &str) -> Result<(), AuthNError> {
        self.inner.destroy(namespace).await
    }
}

/// Password verifier over a fixed user table.
pub struct TableVerifier {
    users: Vec<(&'static str, &'static str)>,
    calls: Mutex<usize>,
}

impl TableVerifier {
    pub fn new(users: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            users,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl CredentialVerifier for TableVerifier {
    async fn verify(&self, credential: &Credential) -> Result<Identity, AuthNError> {
        use secrecy::ExposeSecret;

        *self.calls.lock() += 1;

        let username = credential.username().unwrap_or_default();
        let password = credential
            .password()
            .map(|s| s.expose_secret())
            .unwrap_or_default();

        self.users
            .iter()
            .find(|(u, p)| *u == username && *p == password)
            .map(|(u, _)| Identity::builder().id(*u).build())
            .ok_or_else(|| AuthNError::authentication_failure("invalid username or password"))
    }
}
