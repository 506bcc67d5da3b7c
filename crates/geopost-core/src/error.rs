//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business outcomes with a client-visible status.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No post with post_id={0} found")]
    PostNotFound(String),

    #[error("No posts within {radius_km} km of (longitude={longitude}, latitude={latitude})")]
    NoneNearby {
        radius_km: f64,
        longitude: f64,
        latitude: f64,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store-level errors - infrastructure faults, never client mistakes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failed: {0}")]
    Connection(String),

    #[error("store query failed: {0}")]
    Query(String),
}

/// Request gate and token verification errors.
///
/// The variants stay distinct for logging; the HTTP boundary collapses
/// every rejection into one opaque 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token not provided")]
    TokenMissing,

    #[error("authorization header does not hold a scheme and a token")]
    TokenMalformed,

    #[error("token verification failed: {0}")]
    TokenInvalid(String),

    #[error("subject {0} is not signed up")]
    NotSignedUp(String),

    #[error("signing key retrieval failed: {0}")]
    KeyFetch(String),
}
