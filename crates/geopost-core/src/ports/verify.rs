use async_trait::async_trait;

use crate::error::AuthError;

/// Claims extracted from a verified ID token.
///
/// `issued_at` and `expires_at` are unix timestamps kept for
/// diagnostics only; expiry was already enforced during verification.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Verifies a bearer token against the external identity issuer.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Extract the token from a `"<scheme> <token>"` header value.
///
/// The value is split on whitespace and the second component is the
/// token; the scheme word itself is not inspected.
pub fn token_from_header(raw: &str) -> Result<&str, AuthError> {
    let mut parts = raw.split_whitespace();
    let _scheme = parts.next().ok_or(AuthError::TokenMalformed)?;
    parts.next().ok_or(AuthError::TokenMalformed)
}
