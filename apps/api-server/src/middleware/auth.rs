//! Request gate: bearer-token verification plus registration check.
//!
//! The gate is a linear sequence with one success path and several
//! rejection points: header present, token extractable, token verified
//! by the issuer, subject registered. Every auth rejection maps to 401;
//! only the internal log distinguishes the reasons.

use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use futures::future::LocalBoxFuture;

use geopost_core::error::{AuthError, StoreError};
use geopost_core::ports::token_from_header;
use geopost_shared::ErrorResponse;

use crate::state::AppState;

/// Verified caller identity, bound to the lifetime of one request.
///
/// Use as an extractor on mutating handlers:
/// ```ignore
/// async fn create_post(user: AuthenticatedUser, ...) -> AppResult<HttpResponse> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Gate rejection.
#[derive(Debug)]
pub enum GateError {
    Auth(AuthError),
    Store(StoreError),
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateError::Auth(e) => write!(f, "{e}"),
            GateError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl ResponseError for GateError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            GateError::Auth(AuthError::KeyFetch(_)) => actix_web::http::StatusCode::BAD_GATEWAY,
            GateError::Auth(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            GateError::Store(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            GateError::Auth(AuthError::TokenMissing) => {
                ErrorResponse::unauthorized().with_detail("Token not provided")
            }
            GateError::Auth(AuthError::KeyFetch(_)) => {
                ErrorResponse::new(502, "Bad Gateway").with_detail("identity issuer unreachable")
            }
            // Malformed, unverifiable and unregistered all read the same
            // from outside; the real cause is in the log.
            GateError::Auth(_) => {
                ErrorResponse::unauthorized().with_detail("Invalid token or user not signed up")
            }
            GateError::Store(_) => ErrorResponse::internal_error(),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = GateError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    tracing::error!("AppState not found in app data");
                    GateError::Auth(AuthError::TokenInvalid(
                        "server configuration error".to_string(),
                    ))
                })?;

            let header = req
                .headers()
                .get(state.auth_header.as_str())
                .ok_or(GateError::Auth(AuthError::TokenMissing))?;
            let raw = header
                .to_str()
                .map_err(|_| GateError::Auth(AuthError::TokenMalformed))?;
            let token = token_from_header(raw).map_err(GateError::Auth)?;

            let identity = state.verifier.verify(token).await.map_err(|e| {
                tracing::warn!("token rejected: {e}");
                GateError::Auth(e)
            })?;
            tracing::debug!(
                subject_id = %identity.subject_id,
                issued_at = identity.issued_at,
                expires_at = identity.expires_at,
                "token verified"
            );

            let registered = state
                .store
                .account_exists(&identity.subject_id)
                .await
                .map_err(GateError::Store)?;
            if !registered {
                tracing::warn!(subject_id = %identity.subject_id, "subject not signed up");
                return Err(GateError::Auth(AuthError::NotSignedUp(
                    identity.subject_id,
                )));
            }

            Ok(AuthenticatedUser {
                subject_id: identity.subject_id,
                name: identity.name,
                email: identity.email,
            })
        })
    }
}
