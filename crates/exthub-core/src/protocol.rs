//! Wire types for the three-endpoint extension protocol.
//!
//! Every extension is an HTTP service exposing:
//!
//! - `GET  {url}/info`          -> [`ExtensionInfo`]
//! - `GET  {url}/capabilities`  -> JSON array of [`Capability`]
//! - `POST {url}/execute`       -> [`ExecuteResult`]
//!
//! `/execute` returns HTTP 200 for all logical outcomes, success or
//! business-rule failure; non-2xx is reserved for unexpected crashes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata an extension reports on `GET {url}/info`.
///
/// `title`, `description` and `version` are required by the protocol;
/// the rest is optional display/provenance data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionInfo {
    /// Human-readable display name, e.g. "Expense Tracker".
    pub title: String,
    /// One-line description of what the extension does.
    pub description: String,
    /// Version string, e.g. "1.0.0".
    pub version: String,
    /// Author or owner name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Icon or logo URL for display in the hub UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Homepage or documentation URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
}

impl ExtensionInfo {
    /// Fields the protocol requires on `/info`.
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["title", "description", "version"];

    /// Return the required fields absent (or non-string) in a raw
    /// `/info` payload. Empty means the payload satisfies the protocol.
    pub fn missing_fields(raw: &Value) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| !matches!(raw.get(field), Some(Value::String(s)) if !s.is_empty()))
            .collect()
    }
}

/// Parameter type vocabulary for capability parameters.
///
/// The wire contract fixes these five JSON-style tags. A type string
/// outside the vocabulary is malformed wire data and fails the
/// capabilities fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// One parameter descriptor inside a capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityParameter {
    /// Parameter name, e.g. "amount".
    pub name: String,
    /// JSON-style type tag.
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,
    /// Whether the parameter is required for the action.
    #[serde(default)]
    pub required: bool,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Exhaustive list of the only accepted values, when present.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
    /// Representative value showing the expected format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl CapabilityParameter {
    /// Create a parameter descriptor with just name and type.
    pub fn new(name: impl Into<String>, param_type: ParameterType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            description: None,
            allowed_values: None,
            example: None,
        }
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict to a closed set of accepted values.
    pub fn with_enum(mut self, values: Vec<String>) -> Self {
        self.allowed_values = Some(values);
        self
    }

    /// Set an example value.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// One action an extension advertises on `GET {url}/capabilities`.
///
/// Capabilities are never persisted by the hub; they are fetched live
/// on every query and held only for one request/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Machine-readable action name - must match what `/execute` accepts.
    pub name: String,
    /// Human-readable description of what the action does.
    #[serde(default)]
    pub description: String,
    /// Parameters the action accepts. Omitted or `[]` when none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<CapabilityParameter>,
}

/// Request body for `POST {url}/execute`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// The action name to run.
    pub action: String,
    /// Key-value parameters for the action. Always present on the wire;
    /// `{}` when there are none.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl ExecuteRequest {
    /// Create an execute request.
    pub fn new(action: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            action: action.into(),
            parameters,
        }
    }
}

/// Outcome envelope of one action invocation.
///
/// Exactly one of `data`/`error` is meaningfully populated per the
/// `success` flag. The envelope is used for expected logical failures
/// too (bad input, unknown action); only transport-level failures are
/// signaled out-of-band, and the dispatcher converts even those into
/// this envelope before callers see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResult {
    /// Whether the action completed successfully.
    pub success: bool,
    /// Result payload on success. Any JSON value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable error message when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecuteResult {
    /// Successful result with payload.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed result with error text.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
