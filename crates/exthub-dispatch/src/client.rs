//! HTTP client for the three-endpoint extension protocol.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use exthub_core::{
    Capability, ExecuteRequest, ExecuteResult, ExtensionInfo, HubConfig, HubError, Result,
};

/// Timeouts for extension-facing requests.
///
/// Every network operation carries a bounded timeout so that one
/// unreachable extension cannot stall a query that spans many
/// extensions. Timeouts are treated identically to connection failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Timeout in seconds for `/info` and `/capabilities` probes.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Timeout in seconds for `/execute` forwards.
    #[serde(default = "default_execute_timeout")]
    pub execute_timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_probe_timeout() -> u64 {
    exthub_core::config::defaults::PROBE_TIMEOUT_SECS
}

fn default_execute_timeout() -> u64 {
    exthub_core::config::defaults::EXECUTE_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    exthub_core::config::defaults::CONNECT_TIMEOUT_SECS
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: default_probe_timeout(),
            execute_timeout_secs: default_execute_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl DispatchConfig {
    /// Probe timeout as a Duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Execute timeout as a Duration.
    pub fn execute_timeout(&self) -> Duration {
        Duration::from_secs(self.execute_timeout_secs)
    }
}

impl From<&HubConfig> for DispatchConfig {
    fn from(config: &HubConfig) -> Self {
        Self {
            probe_timeout_secs: config.probe_timeout_secs,
            execute_timeout_secs: config.execute_timeout_secs,
            connect_timeout_secs: exthub_core::config::defaults::CONNECT_TIMEOUT_SECS,
        }
    }
}

/// Client for talking to extension backends.
///
/// Wraps a single pooled [`reqwest::Client`]; per-call timeouts come
/// from [`DispatchConfig`].
pub struct ExtensionClient {
    client: reqwest::Client,
    config: DispatchConfig,
}

impl ExtensionClient {
    /// Create a client with the given timeouts.
    pub fn new(config: DispatchConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Resolve a protocol endpoint against a base URL, tolerating a
    /// trailing slash on the base.
    fn endpoint(base_url: &str, path: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), path)
    }

    /// Fetch `/info` metadata from an extension.
    ///
    /// Transport failure, timeout or non-2xx classify as
    /// [`HubError::Unreachable`]; a reachable extension missing any of
    /// the required fields classifies as [`HubError::InvalidMetadata`].
    /// The distinction matters only at registration time.
    pub async fn fetch_info(&self, base_url: &str) -> Result<ExtensionInfo> {
        let endpoint = Self::endpoint(base_url, "info");
        debug!(endpoint, "fetching extension info");

        let raw = self.get_json(&endpoint).await?;
        let missing = ExtensionInfo::missing_fields(&raw);
        if !missing.is_empty() {
            return Err(HubError::InvalidMetadata(missing.join(", ")));
        }

        serde_json::from_value(raw)
            .map_err(|e| HubError::Unreachable(format!("{endpoint}: malformed info payload: {e}")))
    }

    /// Fetch the live capability list from an extension.
    ///
    /// The contract is a JSON array, possibly empty - an empty array is
    /// a valid, online response. Non-2xx, transport failure, timeout,
    /// and malformed bodies (including a JSON non-array) all collapse
    /// to [`HubError::Unreachable`]; callers must not distinguish
    /// slow, down, and malformed.
    pub async fn fetch_capabilities(&self, base_url: &str) -> Result<Vec<Capability>> {
        let endpoint = Self::endpoint(base_url, "capabilities");
        debug!(endpoint, "fetching extension capabilities");

        let raw = self.get_json(&endpoint).await?;
        if !raw.is_array() {
            return Err(HubError::Unreachable(format!(
                "{endpoint}: expected a JSON array"
            )));
        }

        serde_json::from_value(raw).map_err(|e| {
            HubError::Unreachable(format!("{endpoint}: malformed capability list: {e}"))
        })
    }

    /// Forward one action invocation to an extension.
    ///
    /// Never raises: HTTP non-2xx and transport failures are
    /// synthesized into a `{success: false, error}` envelope, and a 2xx
    /// body is passed through verbatim, trusting the `success` flag as
    /// reported. At-most-once - no retry is ever attempted.
    pub async fn execute(
        &self,
        base_url: &str,
        action: &str,
        parameters: Map<String, Value>,
    ) -> ExecuteResult {
        let endpoint = Self::endpoint(base_url, "execute");
        let body = ExecuteRequest::new(action, parameters);
        debug!(endpoint, action, "dispatching action");

        let response = match self
            .client
            .post(&endpoint)
            .timeout(self.config.execute_timeout())
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint, action, error = %e, "execute transport failure");
                return ExecuteResult::fail(format!("extension unreachable: {e}"));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, action, %status, "execute returned error status");
            return ExecuteResult::fail(format!("extension returned HTTP {status}"));
        }

        match response.json::<ExecuteResult>().await {
            Ok(result) => result,
            Err(e) => ExecuteResult::fail(format!("malformed execute response: {e}")),
        }
    }

    /// Issue a probe GET and parse the body as JSON, collapsing all
    /// failure modes to `Unreachable`.
    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let response = self
            .client
            .get(endpoint)
            .timeout(self.config.probe_timeout())
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint, error = %e, "probe transport failure");
                HubError::Unreachable(format!("{endpoint}: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, %status, "probe returned error status");
            return Err(HubError::Unreachable(format!(
                "{endpoint}: HTTP {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| HubError::Unreachable(format!("{endpoint}: invalid JSON: {e}")))
    }
}
