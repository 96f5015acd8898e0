//! Authentication orchestration.

use std::fmt;
use std::sync::Arc;

use authn_sdk::{AuthNError, CredentialVerifier, SessionStore};
use tracing::{debug, warn};
use warden_identity::Credential;

use super::identifier::Identifier;
use crate::config::AuthNConfig;

/// Builds the identifier used when none was injected.
pub type IdentifierFactory = Arc<dyn Fn() -> Identifier + Send + Sync>;

/// Runs a [`CredentialVerifier`] and attaches the verified identity to an
/// [`Identifier`].
///
/// Authentication never persists anything: after a successful
/// [`authenticate`](Self::authenticate) the caller decides whether to
/// [`sign_in`](Identifier::sign_in).
///
/// ```ignore
/// let mut auth = Authenticator::for_realm(verifier, store, "admin");
/// auth.set_credential_fields([("username", "payam"), ("password", "123456")])?;
/// auth.authenticate().await?.sign_in().await?;
/// ```
pub struct Authenticator {
    verifier: Arc<dyn CredentialVerifier>,
    credential: Option<Credential>,
    identifier: Option<Identifier>,
    default_identifier: IdentifierFactory,
}

impl Authenticator {
    #[must_use]
    pub fn new<F>(verifier: Arc<dyn CredentialVerifier>, default_identifier: F) -> Self
    where
        F: Fn() -> Identifier + Send + Sync + 'static,
    {
        Self {
            verifier,
            credential: None,
            identifier: None,
            default_identifier: Arc::new(default_identifier),
        }
    }

    /// Authenticator whose identifiers live in `realm` of `store`.
    #[must_use]
    pub fn for_realm(
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn SessionStore>,
        realm: impl Into<String>,
    ) -> Self {
        let realm = realm.into();
        Self::new(verifier, move || {
            Identifier::new(realm.clone(), Arc::clone(&store))
        })
    }

    #[must_use]
    pub fn from_config(
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn SessionStore>,
        config: &AuthNConfig,
    ) -> Self {
        Self::for_realm(verifier, store, config.realm.clone())
    }

    /// Authenticator using an injected identifier.
    ///
    /// The default factory produces fresh identifiers over the same realm and
    /// store.
    #[must_use]
    pub fn with_identifier(verifier: Arc<dyn CredentialVerifier>, identifier: Identifier) -> Self {
        let template = identifier.fresh();
        let mut auth = Self::new(verifier, move || template.fresh());
        auth.identifier = Some(identifier);
        auth
    }

    /// Load credential fields for the next attempt.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredential` if a field fails validation; fields loaded
    /// earlier are kept.
    pub fn set_credential_fields<I, K, V>(&mut self, fields: I) -> Result<&mut Self, AuthNError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.ensure_credential().load(fields)?;
        Ok(self)
    }

    /// The credential of the pending attempt, created on first access.
    pub fn credential(&mut self) -> &Credential {
        self.ensure_credential()
    }

    fn ensure_credential(&mut self) -> &mut Credential {
        let verifier = &self.verifier;
        self.credential
            .get_or_insert_with(|| verifier.new_credential())
    }

    /// The current identifier, created from the default factory on first access.
    pub fn identifier(&mut self) -> &mut Identifier {
        let factory = &self.default_identifier;
        self.identifier.get_or_insert_with(|| factory())
    }

    /// Inject the identifier to authenticate into.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSessionState` once the current identifier holds an
    /// authenticated identity.
    pub fn set_identifier(&mut self, identifier: Identifier) -> Result<&mut Self, AuthNError> {
        if self.has_authenticated() {
            return Err(AuthNError::invalid_session_state(
                "identifier already holds an authenticated identity",
            ));
        }
        self.identifier = Some(identifier);
        Ok(self)
    }

    /// Whether the current identifier holds a fulfilled identity.
    #[must_use]
    pub fn has_authenticated(&self) -> bool {
        self.identifier
            .as_ref()
            .is_some_and(|identifier| identifier.identity().is_fulfilled())
    }

    /// Load `fields` and authenticate.
    ///
    /// # Errors
    ///
    /// See [`authenticate`](Self::authenticate); additionally
    /// `InvalidCredential` if a field fails validation.
    pub async fn authenticate_with<I, K, V>(
        &mut self,
        fields: I,
    ) -> Result<&mut Identifier, AuthNError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.set_credential_fields(fields)?;
        self.authenticate().await
    }

    /// Verify the pending credential and attach the identity to the identifier.
    ///
    /// The credential is discarded after the attempt, whatever its outcome.
    /// On failure the identifier is left untouched and nothing is written.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailure` if the verifier rejects the credential or
    ///   returns an unfulfilled identity
    /// - any other error the verifier reports, unchanged
    pub async fn authenticate(&mut self) -> Result<&mut Identifier, AuthNError> {
        let credential = match self.credential.take() {
            Some(credential) => credential,
            None => self.verifier.new_credential(),
        };
        let realm = self.identifier().realm().to_owned();

        let identity = match self.verifier.verify(&credential).await {
            Ok(identity) if identity.is_fulfilled() => identity,
            Ok(_) => {
                warn!(realm = %realm, "verifier returned an unfulfilled identity");
                return Err(AuthNError::authentication_failure(
                    "user authentication failure",
                ));
            }
            Err(e) => {
                warn!(realm = %realm, error = %e, "credential verification failed");
                return Err(e);
            }
        };
        drop(credential);

        let identifier = self.identifier();
        identifier.set_identity(identity)?;
        debug!(realm = %realm, "authenticated");
        Ok(identifier)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("credential", &self.credential)
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use async_trait::async_trait;
    use authn_sdk::IdentifierState;
    use tracing_test::traced_test;
    use warden_identity::Identity;

    use super::*;
    use crate::infra::storage::InMemorySessionStore;

    /// Accepts the username "u1" only.
    struct UsernameVerifier;

    #[async_trait]
    impl CredentialVerifier for UsernameVerifier {
        async fn verify(&self, credential: &Credential) -> Result<Identity, AuthNError> {
            match credential.username() {
                Some("u1") => Ok(Identity::builder().id("u1").build()),
                _ => Err(AuthNError::authentication_failure("unknown user")),
            }
        }
    }

    /// Returns an unfulfilled identity regardless of input.
    struct SloppyVerifier;

    #[async_trait]
    impl CredentialVerifier for SloppyVerifier {
        async fn verify(&self, _credential: &Credential) -> Result<Identity, AuthNError> {
            Ok(Identity::default())
        }
    }

    /// Pre-fills the realm of every new credential.
    struct RealmVerifier;

    #[async_trait]
    impl CredentialVerifier for RealmVerifier {
        fn new_credential(&self) -> Credential {
            Credential::new().with_realm("admin")
        }

        async fn verify(&self, credential: &Credential) -> Result<Identity, AuthNError> {
            let realm = credential.realm().unwrap_or_default();
            Ok(Identity::builder().id(format!("svc@{realm}")).build())
        }
    }

    fn authenticator(verifier: Arc<dyn CredentialVerifier>) -> Authenticator {
        Authenticator::for_realm(verifier, Arc::new(InMemorySessionStore::new()), "admin")
    }

    #[test]
    fn credential_is_created_lazily_by_verifier() {
        let mut auth = authenticator(Arc::new(RealmVerifier));

        assert_eq!(auth.credential().realm(), Some("admin"));
    }

    #[test]
    fn set_credential_fields_chains() {
        let mut auth = authenticator(Arc::new(UsernameVerifier));

        auth.set_credential_fields([("username", "u1")])
            .unwrap()
            .set_credential_fields([("otp", "123")])
            .unwrap();

        let credential = auth.credential();
        assert_eq!(credential.username(), Some("u1"));
        assert_eq!(credential.extra().get("otp").map(String::as_str), Some("123"));
    }

    #[test]
    fn invalid_credential_field_is_reported() {
        let mut auth = authenticator(Arc::new(UsernameVerifier));

        let err = auth.set_credential_fields([("ip", "999.1.1.1")]).unwrap_err();

        assert!(matches!(err, AuthNError::InvalidCredential { .. }));
    }

    #[test]
    fn identifier_is_created_once() {
        let mut auth = authenticator(Arc::new(UsernameVerifier));

        auth.identifier()
            .set_identity(Identity::builder().id("u9").build())
            .unwrap();

        assert_eq!(auth.identifier().state(), IdentifierState::BoundUnpersisted);
        assert!(auth.has_authenticated());
    }

    #[tokio::test]
    async fn authenticate_binds_identity_without_signing_in() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut auth = Authenticator::for_realm(Arc::new(UsernameVerifier), store.clone(), "admin");

        let identifier = auth.authenticate_with([("username", "u1")]).await.unwrap();

        assert_eq!(identifier.state(), IdentifierState::BoundUnpersisted);
        assert!(!identifier.can_recognize_identity().await.unwrap());
        assert!(auth.has_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn credential_is_discarded_after_attempt() {
        let mut auth = authenticator(Arc::new(UsernameVerifier));

        let _ = auth.authenticate_with([("username", "nobody")]).await;

        assert!(auth.credential().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_verification_leaves_identifier_untouched() {
        let mut auth = authenticator(Arc::new(UsernameVerifier));

        let err = auth
            .authenticate_with([("username", "nobody")])
            .await
            .unwrap_err();

        assert!(matches!(err, AuthNError::AuthenticationFailure(_)));
        assert!(!auth.has_authenticated());
        assert_eq!(auth.identifier().state(), IdentifierState::Unrecognized);
        assert!(logs_contain("credential verification failed"));
    }

    #[tokio::test]
    async fn unfulfilled_verifier_result_is_an_authentication_failure() {
        let mut auth = authenticator(Arc::new(SloppyVerifier));

        let err = auth.authenticate().await.unwrap_err();

        assert!(matches!(err, AuthNError::AuthenticationFailure(_)));
        assert!(!auth.has_authenticated());
    }

    #[tokio::test]
    async fn set_identifier_rejected_after_authentication() {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let mut auth = Authenticator::for_realm(Arc::new(UsernameVerifier), store.clone(), "admin");
        auth.authenticate_with([("username", "u1")]).await.unwrap();

        let err = auth
            .set_identifier(Identifier::new("customer", store))
            .unwrap_err();

        assert!(matches!(err, AuthNError::InvalidSessionState(_)));
        assert_eq!(auth.identifier().realm(), "admin");
    }

    #[tokio::test]
    async fn injected_identifier_is_used() {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let mut auth =
            Authenticator::with_identifier(Arc::new(RealmVerifier), Identifier::new("ops", store));

        let identifier = auth.authenticate().await.unwrap();

        assert_eq!(identifier.realm(), "ops");
        assert_eq!(
            identifier.identity().id().map(ToString::to_string),
            Some("svc@admin".to_owned())
        );
    }
}
