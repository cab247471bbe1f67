//! CORS policy shared by the hub API and the demo extension.
//!
//! Extension frontends call cross-origin from anywhere, so origin,
//! methods and headers are all wide open. Preflight answers are
//! 204 No Content.

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};

/// Allow-anything CORS layer.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Rewrite CORS preflight answers from 200 to 204.
///
/// Layered outside [`cors_layer`], which answers preflight itself with
/// 200 and a body-less response.
pub async fn preflight_status(req: Request, next: Next) -> Response {
    let is_options = req.method() == Method::OPTIONS;
    let mut response = next.run(req).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}
