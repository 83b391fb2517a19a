//! Credentials sign-in through an identity provider
//!
//! The dashboard never checks passwords itself. It forwards the submitted
//! payload to an [`IdentityProvider`] under the `"credentials"` strategy and
//! only interprets the failure it gets back.

use crate::core::validation::FormFields;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Strategy name passed to the provider for username/password sign-in
pub const CREDENTIALS_STRATEGY: &str = "credentials";

/// Form key holding the username
pub const EMAIL_FIELD: &str = "email";
/// Form key holding the password
pub const PASSWORD_FIELD: &str = "password";

/// Raw sign-in payload, forwarded to the provider as submitted
#[derive(Clone, Default)]
pub struct Credentials(FormFields);

impl Credentials {
    pub fn new(fields: FormFields) -> Self {
        Self(fields)
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(FormFields::from_pairs(pairs))
    }

    pub fn email(&self) -> Option<&str> {
        self.0.get(EMAIL_FIELD)
    }

    pub fn password(&self) -> Option<&str> {
        self.0.get(PASSWORD_FIELD)
    }

    /// Every submitted field, for providers that read more than the pair
    pub fn fields(&self) -> &FormFields {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email())
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Failure kinds the provider documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    /// The credentials were checked and rejected
    CredentialsSignin,
    AccessDenied,
    CallbackRouteError,
    Configuration,
    Verification,
    MissingCsrf,
    UnknownAction,
}

impl AuthErrorKind {
    pub const ALL: &'static [AuthErrorKind] = &[
        AuthErrorKind::CredentialsSignin,
        AuthErrorKind::AccessDenied,
        AuthErrorKind::CallbackRouteError,
        AuthErrorKind::Configuration,
        AuthErrorKind::Verification,
        AuthErrorKind::MissingCsrf,
        AuthErrorKind::UnknownAction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::CredentialsSignin => "CredentialsSignin",
            AuthErrorKind::AccessDenied => "AccessDenied",
            AuthErrorKind::CallbackRouteError => "CallbackRouteError",
            AuthErrorKind::Configuration => "Configuration",
            AuthErrorKind::Verification => "Verification",
            AuthErrorKind::MissingCsrf => "MissingCSRF",
            AuthErrorKind::UnknownAction => "UnknownAction",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthErrorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown auth error kind '{}'", s))
    }
}

/// Why a sign-in did not complete
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// A failure the provider classifies
    #[error("sign-in failed: {0}")]
    Known(AuthErrorKind),

    /// Anything outside the provider's taxonomy
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

/// External identity verification
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `payload` with the named strategy.
    ///
    /// `Ok(())` means the user is signed in.
    async fn sign_in(&self, strategy: &str, payload: &Credentials) -> Result<(), SignInError>;
}

/// Development provider backed by a fixed user list
///
/// Passwords are held in memory as given. Not for production use.
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    users: HashMap<String, String>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user; emails are matched case-insensitively
    pub fn with_user(mut self, email: impl AsRef<str>, password: impl Into<String>) -> Self {
        self.users
            .insert(email.as_ref().trim().to_lowercase(), password.into());
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, strategy: &str, payload: &Credentials) -> Result<(), SignInError> {
        if strategy != CREDENTIALS_STRATEGY {
            return Err(SignInError::Known(AuthErrorKind::Configuration));
        }

        let (Some(email), Some(password)) = (payload.email(), payload.password()) else {
            return Err(SignInError::Known(AuthErrorKind::CredentialsSignin));
        };

        match self.users.get(&email.trim().to_lowercase()) {
            Some(expected) if bool::from(expected.as_bytes().ct_eq(password.as_bytes())) => Ok(()),
            _ => Err(SignInError::Known(AuthErrorKind::CredentialsSignin)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> InMemoryIdentityProvider {
        InMemoryIdentityProvider::new().with_user("user@nextmail.com", "123456")
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in AuthErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<AuthErrorKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_kind_parse_unknown() {
        assert!("SomethingElse".parse::<AuthErrorKind>().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::from_pairs([("email", "a@b.c"), ("password", "hunter2")]);
        let debug = format!("{:?}", creds);
        assert!(debug.contains("a@b.c"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_provider_accepts_known_user() {
        let creds = Credentials::from_pairs([("email", "User@Nextmail.com"), ("password", "123456")]);
        assert!(provider().sign_in(CREDENTIALS_STRATEGY, &creds).await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_rejects_wrong_password() {
        let creds = Credentials::from_pairs([("email", "user@nextmail.com"), ("password", "nope")]);
        let err = provider().sign_in(CREDENTIALS_STRATEGY, &creds).await.unwrap_err();
        assert!(matches!(err, SignInError::Known(AuthErrorKind::CredentialsSignin)));
    }

    #[tokio::test]
    async fn test_provider_rejects_missing_password() {
        let creds = Credentials::from_pairs([("email", "user@nextmail.com")]);
        let err = provider().sign_in(CREDENTIALS_STRATEGY, &creds).await.unwrap_err();
        assert!(matches!(err, SignInError::Known(AuthErrorKind::CredentialsSignin)));
    }

    #[tokio::test]
    async fn test_provider_rejects_other_strategy() {
        let creds = Credentials::from_pairs([("email", "user@nextmail.com"), ("password", "123456")]);
        let err = provider().sign_in("github", &creds).await.unwrap_err();
        assert!(matches!(err, SignInError::Known(AuthErrorKind::Configuration)));
    }

    #[tokio::test]
    async fn test_provider_rejects_password_prefix_and_extension() {
        for password in ["12345", "1234567", "123457"] {
            let creds = Credentials::from_pairs([("email", "user@nextmail.com"), ("password", password)]);
            let err = provider().sign_in(CREDENTIALS_STRATEGY, &creds).await.unwrap_err();
            assert!(matches!(err, SignInError::Known(AuthErrorKind::CredentialsSignin)));
        }
    }
}
