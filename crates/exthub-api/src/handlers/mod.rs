//! API handlers organized by domain.

pub mod aggregate;
pub mod basic;
pub mod extensions;

// Re-export ServerState so handlers can use it
pub use crate::server::ServerState;
