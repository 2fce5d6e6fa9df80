//! Auth provider client (Identity Toolkit REST).
//!
//! Email/password sign-up and sign-in, OAuth credential exchange, sign-out,
//! and an auth-state subscription. The popup half of OAuth happens in the
//! presentation layer; this client exchanges the credential the popup
//! obtained. Auth state is a `watch` channel: subscribers always see the
//! current user or `None`, and every sign-in/sign-out publishes.
//!
//! Without an API key every sign-in path fails with
//! [`AuthError::NotConfigured`]; sign-out still succeeds so a session can
//! always be dropped.

pub mod error;

pub use error::AuthError;

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use marigold_core::{Email, UserId};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::config::AuthConfig;

const IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: UserId,
    pub email: Option<Email>,
    pub display_name: Option<String>,
}

/// Supported OAuth identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    const fn id(self) -> &'static str {
        match self {
            Self::Google => "google.com",
        }
    }
}

/// Client for the auth provider.
///
/// Cheaply cloneable; clones share the auth state channel.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    state: watch::Sender<Option<AuthUser>>,
}

impl AuthClient {
    /// Create a client; `None` config disables every sign-in path.
    #[must_use]
    pub fn new(config: Option<&AuthConfig>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            inner: Arc::new(AuthClientInner {
                http: reqwest::Client::new(),
                api_key: config.map(|c| c.api_key.clone()),
                state,
            }),
        }
    }

    /// Whether an API key is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.inner.api_key.is_some()
    }

    /// The currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to auth-state changes.
    ///
    /// The receiver yields the current user or `None` on every sign-in and
    /// sign-out, starting from the present state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.inner.state.subscribe()
    }

    /// Create an account with email and password, signing the user in.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without an API key, `EmailExists` for a taken email,
    /// `WeakPassword` when the provider rejects the password.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &Email, password: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .call(
                "signUp",
                json!({
                    "email": email.as_str(),
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.publish(user_from_response(&response))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without an API key, `InvalidCredentials` for a wrong
    /// email/password combination.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &Email, password: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .call(
                "signInWithPassword",
                json!({
                    "email": email.as_str(),
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.publish(user_from_response(&response))
    }

    /// Exchange an OAuth credential (obtained by the presentation layer's
    /// popup flow) for a signed-in user.
    ///
    /// # Errors
    ///
    /// `NotConfigured` without an API key, `Provider` when the exchange is
    /// rejected.
    #[instrument(skip(self, id_token))]
    pub async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        id_token: &str,
    ) -> Result<AuthUser, AuthError> {
        let response = self
            .call(
                "signInWithIdp",
                json!({
                    "postBody": format!("id_token={id_token}&providerId={}", provider.id()),
                    "requestUri": "http://localhost",
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.publish(user_from_response(&response))
    }

    /// Sign out, publishing `None` to subscribers.
    ///
    /// Succeeds even when unconfigured: a local session can always end.
    pub fn sign_out(&self) {
        info!("signed out");
        self.inner.state.send_replace(None);
    }

    fn publish(&self, user: Result<AuthUser, AuthError>) -> Result<AuthUser, AuthError> {
        if let Ok(user) = &user {
            info!(uid = %user.uid, "signed in");
            self.inner.state.send_replace(Some(user.clone()));
        }
        user
    }

    async fn call(&self, action: &str, body: Value) -> Result<Value, AuthError> {
        let api_key = self.inner.api_key.as_ref().ok_or(AuthError::NotConfigured)?;

        let url = format!("{IDENTITY_ENDPOINT}/accounts:{action}");
        let response = self
            .inner
            .http
            .post(&url)
            .query(&[("key", api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(payload);
        }

        let message = payload
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("no error details");
        Err(map_provider_error(message))
    }
}

/// Map the provider's error codes onto the local taxonomy.
fn map_provider_error(message: &str) -> AuthError {
    match message {
        "EMAIL_EXISTS" => AuthError::EmailExists,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AuthError::InvalidCredentials
        }
        "USER_DISABLED" => AuthError::UserDisabled,
        m if m.starts_with("WEAK_PASSWORD") => AuthError::WeakPassword(m.to_owned()),
        other => AuthError::Provider(other.to_owned()),
    }
}

/// Build an [`AuthUser`] from a sign-in/sign-up response.
fn user_from_response(response: &Value) -> Result<AuthUser, AuthError> {
    let uid = response
        .get("localId")
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::Provider("response has no localId".to_owned()))?;

    let email = response
        .get("email")
        .and_then(Value::as_str)
        .and_then(|raw| Email::parse(raw).ok());

    // Prefer the response field; fall back to the ID token's name claim
    let display_name = response
        .get("displayName")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .or_else(|| {
            response
                .get("idToken")
                .and_then(Value::as_str)
                .and_then(decode_claims)
                .as_ref()
                .and_then(|claims| claims.get("name"))
                .and_then(Value::as_str)
                .map(str::to_owned)
        });

    Ok(AuthUser {
        uid: UserId::new(uid),
        email,
        display_name,
    })
}

/// Decode the (unverified) claims segment of a JWT.
///
/// The token came to us over TLS from the provider itself, so this is a
/// payload read, not a signature check.
fn decode_claims(token: &str) -> Option<Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_provider_error() {
        assert!(matches!(
            map_provider_error("EMAIL_EXISTS"),
            AuthError::EmailExists
        ));
        assert!(matches!(
            map_provider_error("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            map_provider_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword(_)
        ));
        assert!(matches!(
            map_provider_error("QUOTA_EXCEEDED"),
            AuthError::Provider(_)
        ));
    }

    #[test]
    fn test_decode_claims() {
        let claims = URL_SAFE_NO_PAD.encode(r#"{"name":"Asha","sub":"u1"}"#);
        let token = format!("header.{claims}.signature");

        let decoded = decode_claims(&token).unwrap();
        assert_eq!(decoded["name"], "Asha");
        assert!(decode_claims("not-a-jwt").is_none());
    }

    #[test]
    fn test_user_from_response_prefers_display_name() {
        let response = json!({
            "localId": "u1",
            "email": "asha@example.com",
            "displayName": "Asha",
        });
        let user = user_from_response(&response).unwrap();
        assert_eq!(user.uid, UserId::new("u1"));
        assert_eq!(user.email.unwrap().as_str(), "asha@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let client = AuthClient::new(None);
        assert!(!client.is_configured());
        assert!(client.current_user().is_none());

        let email = Email::parse("asha@example.com").unwrap();
        assert!(matches!(
            client.sign_in(&email, "secret").await,
            Err(AuthError::NotConfigured)
        ));

        // Sign-out still works and publishes to subscribers
        let receiver = client.subscribe();
        client.sign_out();
        assert!(receiver.borrow().is_none());
    }
}
