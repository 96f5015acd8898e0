//! Realm-scoped identifier: binds an identity to a session store.

use std::sync::Arc;

use authn_sdk::{AuthNError, IdentifierState, SessionStore};
use tracing::{debug, info, warn};
use warden_identity::constants::IDENTITY_STORAGE_KEY;
use warden_identity::{Identity, decode_bin, encode_bin};

use super::realm_storage::RealmStorage;

/// Binds an [`Identity`] to a durable recognition channel for one realm.
///
/// The identity is written under [`IDENTITY_STORAGE_KEY`] inside the
/// namespace `IDENTITY_<realm>`. Recognition only tests presence in the
/// store: how long-lived the underlying session is does not matter.
///
/// Concurrent sign-ins into the same realm of a shared store are
/// last-writer-wins; no locking happens here.
#[derive(Debug)]
pub struct Identifier {
    realm: String,
    identity: Identity,
    state: IdentifierState,
    storage: RealmStorage,
}

impl Identifier {
    #[must_use]
    pub fn new(realm: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        let realm = realm.into();
        let storage = RealmStorage::new(store, &realm);
        Self {
            realm,
            identity: Identity::default(),
            state: IdentifierState::Unrecognized,
            storage,
        }
    }

    /// A new, unbound identifier over the same realm and store.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::new(self.realm.clone(), self.storage.store())
    }

    #[must_use]
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Store namespace owned by this identifier's realm.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.storage.namespace()
    }

    /// The in-memory identity; the empty sentinel when nothing is bound.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn state(&self) -> IdentifierState {
        self.state
    }

    /// Attach an identity in memory without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSessionState` if the identity is not fulfilled; the
    /// previously bound identity is kept.
    pub fn set_identity(&mut self, identity: Identity) -> Result<&mut Self, AuthNError> {
        if !identity.is_fulfilled() {
            return Err(AuthNError::invalid_session_state(
                "cannot bind an unfulfilled identity",
            ));
        }

        self.identity = identity;
        self.state = IdentifierState::BoundUnpersisted;
        debug!(realm = %self.realm, "identity bound");
        Ok(self)
    }

    /// Persist the bound identity, replacing any session in this realm.
    ///
    /// # Errors
    ///
    /// - `InvalidSessionState` if no fulfilled identity is bound; the store is
    ///   left untouched
    /// - `StoreUnavailable` if the store cannot be written; when the old
    ///   session was already destroyed the identifier is left
    ///   `BoundUnpersisted`
    /// - `Internal` if the identity cannot be encoded
    pub async fn sign_in(&mut self) -> Result<(), AuthNError> {
        if !self.identity.is_fulfilled() {
            return Err(AuthNError::invalid_session_state(
                "identity does not exist or is not fulfilled",
            ));
        }

        let payload = encode_bin(&self.identity)?;

        self.storage.destroy().await?;
        // The previous session is gone; only a successful write signs in.
        self.state = IdentifierState::BoundUnpersisted;
        self.storage.set(IDENTITY_STORAGE_KEY, payload).await?;
        self.state = IdentifierState::SignedIn;

        info!(realm = %self.realm, namespace = %self.namespace(), "identity signed in");
        Ok(())
    }

    /// Whether the store holds an identity for this realm.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be read.
    pub async fn can_recognize_identity(&self) -> Result<bool, AuthNError> {
        self.storage.has(IDENTITY_STORAGE_KEY).await
    }

    /// Rebuild the signed-in identity from the store.
    ///
    /// Returns `None` when nothing is stored. A stored payload that cannot be
    /// decoded, or that decodes to an unfulfilled identity, is logged and also
    /// reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be read.
    pub async fn recognized_identity(&self) -> Result<Option<Identity>, AuthNError> {
        let Some(bytes) = self.storage.get(IDENTITY_STORAGE_KEY).await? else {
            return Ok(None);
        };

        match decode_bin(&bytes) {
            Ok(identity) if identity.is_fulfilled() => Ok(Some(identity)),
            Ok(_) => {
                warn!(
                    realm = %self.realm,
                    namespace = %self.namespace(),
                    "stored identity is not fulfilled, treating as signed out"
                );
                Ok(None)
            }
            Err(e) => {
                let e = AuthNError::from(e);
                warn!(
                    realm = %self.realm,
                    namespace = %self.namespace(),
                    error = %e,
                    "stored identity could not be decoded, treating as signed out"
                );
                Ok(None)
            }
        }
    }

    /// Load the recognized identity into this identifier.
    ///
    /// Returns `true` and moves to `SignedIn` when the store holds a usable
    /// identity. Otherwise returns `false`; an identifier that believed it was
    /// signed in is reset to `Unrecognized`, a bound but unpersisted identity
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be read.
    pub async fn recognize(&mut self) -> Result<bool, AuthNError> {
        if let Some(identity) = self.recognized_identity().await? {
            self.identity = identity;
            self.state = IdentifierState::SignedIn;
            debug!(realm = %self.realm, "identity recognized");
            return Ok(true);
        }

        if self.state == IdentifierState::SignedIn {
            self.identity.clean();
            self.state = IdentifierState::Unrecognized;
        }
        Ok(false)
    }

    /// Destroy the realm namespace and clear the in-memory identity.
    ///
    /// Signing out when nothing is signed in is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store cannot be written; the
    /// in-memory identity is kept in that case.
    pub async fn sign_out(&mut self) -> Result<(), AuthNError> {
        self.storage.destroy().await?;
        self.identity.clean();
        self.state = IdentifierState::SignedOut;

        info!(realm = %self.realm, namespace = %self.namespace(), "identity signed out");
        Ok(())
    }
}
