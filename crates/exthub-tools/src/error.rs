//! Error types for the tools crate.

/// Tool error types.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// Invalid arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Execution error
    #[error("Execution error: {0}")]
    Execution(String),
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

impl From<exthub_core::HubError> for ToolError {
    fn from(e: exthub_core::HubError) -> Self {
        ToolError::Execution(e.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::InvalidArguments(e.to_string())
    }
}
