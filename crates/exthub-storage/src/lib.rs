//! Persistent registry storage for the hub.
//!
//! Provides a redb-backed implementation of the core
//! [`RegistryStore`](exthub_core::RegistryStore) trait so registered
//! extensions survive server restarts. The hub itself treats the
//! registry as an opaque name-keyed store; this crate is the only place
//! that knows records live in a redb table.

pub mod error;
pub mod extensions;

pub use error::{Error, Result};
pub use extensions::RedbRegistry;
