//! HTTP API for the extension hub.
//!
//! Exposes the registry and dispatch layer over REST: public routes for
//! discovery, the execute proxy, and the aggregate scans; admin routes
//! behind a shared `X-API-Key` credential for registry writes. Also
//! ships a demo extension implementing the three-endpoint contract,
//! used by `serve --with-demo` and the integration tests.

pub mod auth;
pub mod cors;
pub mod demo;
pub mod handlers;
pub mod models;
pub mod server;

pub use demo::demo_extension_router;
pub use models::{ErrorResponse, HandlerResult};
pub use server::{build_router, run, ServerState};
