//! Authentication ports.
//!
//! Accounts and sign-in live in an external identity service; this side only
//! verifies the access tokens it issues.

use uuid::Uuid;

/// Claims carried by a verified access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: i64,
}

/// Verifies bearer tokens issued by the identity service.
pub trait TokenVerifier: Send + Sync {
    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
