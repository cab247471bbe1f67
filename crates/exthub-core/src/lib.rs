//! Core types for the Exthub extension hub.
//!
//! This crate defines the three-endpoint extension wire protocol
//! (`/info`, `/capabilities`, `/execute`), the registry record and store
//! boundary, the hub error taxonomy, and configuration. Everything that
//! talks HTTP lives in `exthub-dispatch`; everything that persists lives
//! in `exthub-storage`.

pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;

pub use config::HubConfig;
pub use error::{HubError, Result};
pub use protocol::{
    Capability, CapabilityParameter, ExecuteRequest, ExecuteResult, ExtensionInfo, ParameterType,
};
pub use registry::{ExtensionRecord, MemoryRegistry, RegistryStore};
