use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use secrecy::SecretString;

/// Field names with a typed slot in [`Credential`].
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const TOKEN: &str = "token";
    pub const REALM: &str = "realm";
    pub const IP: &str = "ip";
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid credential field '{field}': {message}")]
    InvalidField { field: String, message: String },
}

impl CredentialError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `Credential` is what was presented for one authentication attempt.
///
/// Recognized fields get typed slots; every other field is retained in
/// [`Credential::extra`] so verifiers can pick what they need. Secrets are
/// wrapped in `SecretString` so `Debug` redacts them.
#[derive(Clone, Default)]
pub struct Credential {
    username: Option<String>,
    password: Option<SecretString>,
    token: Option<SecretString>,
    realm: Option<String>,
    ip: Option<IpAddr>,
    extra: BTreeMap<String, String>,
}

impl Credential {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a credential from loosely-typed input fields.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidField` if a field fails validation.
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self, CredentialError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut credential = Self::new();
        credential.load(fields)?;
        Ok(credential)
    }

    /// Populate fields from loosely-typed input, merging into what is already set.
    ///
    /// Validation happens before anything is applied: on error the credential
    /// is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::InvalidField` for an empty field name or an
    /// `ip` value that is not an IP address.
    pub fn load<I, K, V>(&mut self, fields: I) -> Result<(), CredentialError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut staged = self.clone();
        for (name, value) in fields {
            staged.set_field(name.as_ref(), value.into())?;
        }
        *self = staged;
        Ok(())
    }

    fn set_field(&mut self, name: &str, value: String) -> Result<(), CredentialError> {
        match name {
            "" => return Err(CredentialError::invalid(name, "field name is empty")),
            fields::USERNAME => self.username = Some(value),
            fields::PASSWORD => self.password = Some(value.into()),
            fields::TOKEN => self.token = Some(value.into()),
            fields::REALM => self.realm = Some(value),
            fields::IP => {
                let ip = value
                    .trim()
                    .parse::<IpAddr>()
                    .map_err(|e| CredentialError::invalid(name, e.to_string()))?;
                self.ip = Some(ip);
            }
            other => {
                self.extra.insert(other.to_owned(), value);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<SecretString>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<SecretString>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = Some(realm.into());
        self
    }

    #[must_use]
    pub fn with_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip);
        self
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// Fields without a typed slot.
    #[must_use]
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.token.is_none()
            && self.realm.is_none()
            && self.ip.is_none()
            && self.extra.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Unknown fields may carry secrets (OTPs, PINs); only their names are shown.
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &self.password)
            .field("token", &self.token)
            .field("realm", &self.realm)
            .field("ip", &self.ip)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}
