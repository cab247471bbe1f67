//! Shared-credential authentication for registry writes.
//!
//! Admin routes require the configured key in the `X-API-Key` header.
//! Until a key is configured, every write is rejected.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::models::ErrorResponse;
use crate::server::ServerState;

/// Header carrying the admin credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key authentication middleware for admin routes.
pub async fn api_key_middleware(
    State(state): State<ServerState>,
    headers: HeaderMap,
    req: Request,
    next: Next,
) -> Result<Response, ErrorResponse> {
    let Some(expected) = state.api_key.as_deref() else {
        return Err(ErrorResponse::unauthorized(
            "Registry writes are disabled: no admin API key is configured",
        ));
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ErrorResponse::unauthorized("Missing X-API-Key header"))?;

    if provided != expected {
        return Err(ErrorResponse::unauthorized("Invalid API key"));
    }

    Ok(next.run(req).await)
}
