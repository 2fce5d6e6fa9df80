//! Auth provider error taxonomy.

use thiserror::Error;

/// Errors from the auth provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No API key is configured; authentication is unavailable.
    #[error("auth provider is not configured")]
    NotConfigured,

    /// Wrong email/password combination, or no such account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sign-up with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailExists,

    /// The provider rejected the password as too weak.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The account exists but has been disabled.
    #[error("account disabled")]
    UserDisabled,

    /// Any other provider-reported failure.
    #[error("auth provider error: {0}")]
    Provider(String),

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider's response did not decode.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
