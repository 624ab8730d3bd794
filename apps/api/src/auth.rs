//! API key authentication.
//!
//! When an API key is configured, every `/api/*` route requires a matching
//! `X-API-Key` header. Without a configured key the check is disabled
//! (development only; production config refuses to start without one).

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware rejecting requests without the configured API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if key_matches(key, expected) => Ok(next.run(request).await),
        _ => {
            warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Compares the provided key with the configured one in constant time.
fn key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
