//! Route table assembly.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{aggregate, basic, extensions};
use crate::server::ServerState;

/// Maximum request body size (1 MB). Registration and execute bodies
/// are small; anything larger is a client bug.
const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// Build the API router.
pub fn build_router(state: ServerState) -> Router {
    // Public routes (read-only plus the execute proxy).
    let public_routes = Router::new()
        .route("/api/health", get(basic::health_handler))
        .route("/api/extensions", get(extensions::list_extensions_handler))
        .route(
            "/api/extensions/register",
            get(extensions::preview_extension_handler),
        )
        .route(
            "/api/extensions/capabilities",
            get(aggregate::list_capabilities_handler),
        )
        .route("/api/reminders", get(aggregate::list_reminders_handler))
        .route(
            "/api/extensions/:name/execute",
            post(extensions::execute_extension_handler),
        );

    // Admin routes (registry writes, X-API-Key protected).
    let admin_routes = Router::new()
        .route(
            "/api/extensions",
            post(extensions::register_extension_handler),
        )
        .route(
            "/api/extensions/:name",
            delete(extensions::unregister_extension_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::api_key_middleware,
        ));

    admin_routes
        .merge(public_routes)
        .layer(tower_http::limit::RequestBodyLimitLayer::new(
            MAX_REQUEST_BODY_SIZE,
        ))
        .layer(crate::cors::cors_layer())
        .layer(axum::middleware::from_fn(crate::cors::preflight_status))
        .with_state(state)
}
