//! Login action
//!
//! Known provider failures become one of two fixed messages. Anything the
//! provider does not classify is returned as an error, untouched.

use crate::core::auth::{AuthErrorKind, CREDENTIALS_STRATEGY, Credentials, IdentityProvider, SignInError};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

/// Result of a login attempt that did not fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn,
    /// Message to show on the login form
    Rejected(&'static str),
}

/// Map a known failure kind to its user-facing message
pub fn message_for(kind: AuthErrorKind) -> &'static str {
    match kind {
        AuthErrorKind::CredentialsSignin => INVALID_CREDENTIALS,
        _ => SOMETHING_WENT_WRONG,
    }
}

/// Sign in with the credentials strategy.
///
/// `previous` is the message from the last attempt; it does not influence
/// this one.
pub async fn authenticate(
    provider: &dyn IdentityProvider,
    previous: Option<&str>,
    payload: &Credentials,
) -> anyhow::Result<AuthOutcome> {
    match provider.sign_in(CREDENTIALS_STRATEGY, payload).await {
        Ok(()) => {
            tracing::info!("signed in");
            Ok(AuthOutcome::SignedIn)
        }
        Err(SignInError::Known(kind)) => {
            tracing::debug!(%kind, retry = previous.is_some(), "sign-in rejected");
            Ok(AuthOutcome::Rejected(message_for(kind)))
        }
        Err(SignInError::Fault(e)) => {
            tracing::warn!(error = %e, "identity provider fault");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider answering with a scripted result and recording the strategy
    struct Scripted {
        answer: fn() -> Result<(), SignInError>,
        strategies: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(answer: fn() -> Result<(), SignInError>) -> Self {
            Self {
                answer,
                strategies: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for Scripted {
        async fn sign_in(&self, strategy: &str, _payload: &Credentials) -> Result<(), SignInError> {
            self.strategies.lock().unwrap().push(strategy.to_string());
            (self.answer)()
        }
    }

    #[tokio::test]
    async fn test_success_signs_in_with_credentials_strategy() {
        let provider = Scripted::new(|| Ok(()));
        let outcome = authenticate(&provider, None, &Credentials::default()).await.unwrap();

        assert_eq!(outcome, AuthOutcome::SignedIn);
        assert_eq!(*provider.strategies.lock().unwrap(), vec!["credentials".to_string()]);
    }

    #[tokio::test]
    async fn test_credentials_signin_maps_to_invalid_credentials() {
        let provider = Scripted::new(|| Err(SignInError::Known(AuthErrorKind::CredentialsSignin)));
        let outcome = authenticate(&provider, None, &Credentials::default()).await.unwrap();
        assert_eq!(outcome, AuthOutcome::Rejected("Invalid credentials."));
    }

    #[tokio::test]
    async fn test_other_known_kinds_map_to_something_went_wrong() {
        for kind in AuthErrorKind::ALL
            .iter()
            .filter(|k| **k != AuthErrorKind::CredentialsSignin)
        {
            assert_eq!(message_for(*kind), "Something went wrong.");
        }

        let provider = Scripted::new(|| Err(SignInError::Known(AuthErrorKind::AccessDenied)));
        let outcome = authenticate(&provider, Some("Invalid credentials."), &Credentials::default())
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Rejected("Something went wrong."));
    }

    #[tokio::test]
    async fn test_unknown_fault_is_propagated_unchanged() {
        let provider = Scripted::new(|| Err(SignInError::Fault(anyhow::anyhow!("socket closed"))));
        let err = authenticate(&provider, None, &Credentials::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "socket closed");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sign_in_logs_never_contain_the_email() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let creds = Credentials::from_pairs([("email", "user@nextmail.com"), ("password", "123456")]);
        authenticate(&Scripted::new(|| Ok(())), None, &creds).await.unwrap();
        authenticate(
            &Scripted::new(|| Err(SignInError::Known(AuthErrorKind::CredentialsSignin))),
            None,
            &creds,
        )
        .await
        .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("signed in"));
        assert!(!output.contains("user@nextmail.com"));
    }
}
