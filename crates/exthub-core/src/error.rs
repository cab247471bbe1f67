//! Error taxonomy for the hub.
//!
//! Extension-facing I/O failures are caught and converted at the
//! dispatch boundary; they surface either as `Unreachable` (liveness
//! probes, registration) or as a synthesized `{success: false, error}`
//! envelope (execute). A logical failure reported by an extension
//! itself is not an error type here - it travels inside
//! [`ExecuteResult`](crate::protocol::ExecuteResult) verbatim.

use thiserror::Error;

/// Result type for hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// Hub error types.
#[derive(Debug, Clone, Error)]
pub enum HubError {
    /// Transport failure, timeout, non-2xx status, or malformed body
    /// from an extension. Callers cannot distinguish slow, down, and
    /// malformed - all collapse to this single liveness signal.
    #[error("extension unreachable: {0}")]
    Unreachable(String),

    /// Extension reachable but `/info` is missing required fields.
    /// Only fatal at registration time.
    #[error("invalid extension metadata: missing {0}")]
    InvalidMetadata(String),

    /// Registry uniqueness violation on `name`.
    #[error("extension '{0}' is already registered")]
    DuplicateName(String),

    /// Unknown extension name.
    #[error("extension '{0}' not found")]
    NotFound(String),

    /// Syntactically invalid base URL at registration time.
    #[error("invalid extension url: {0}")]
    InvalidUrl(String),

    /// Unusable registry name at registration time.
    #[error("invalid extension name: {0}")]
    InvalidName(String),

    /// Registry store failure.
    #[error("storage error: {0}")]
    Storage(String),
}
