//! Registration gate: confirm an extension satisfies the minimum
//! protocol before it is persisted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use exthub_core::{Capability, ExtensionInfo, Result};

use crate::client::ExtensionClient;

/// What a registrar sees before confirming a registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationPreview {
    /// The extension's `/info` payload.
    pub info: ExtensionInfo,
    /// The extension's advertised actions, when the capabilities probe
    /// succeeded. `None` does not block registration - capabilities are
    /// always fetched live afterwards, never cached.
    pub capabilities: Option<Vec<Capability>>,
}

/// Probe an extension for registration.
///
/// Fetches `/info` first: an unreachable extension and one missing
/// required metadata produce distinct errors
/// ([`HubError::Unreachable`](exthub_core::HubError::Unreachable) vs
/// [`HubError::InvalidMetadata`](exthub_core::HubError::InvalidMetadata)).
/// On success, `/capabilities` is fetched best-effort so a human can
/// confirm what they are registering.
pub async fn validate_and_preview(
    client: &ExtensionClient,
    url: &str,
) -> Result<RegistrationPreview> {
    let info = client.fetch_info(url).await?;

    let capabilities = match client.fetch_capabilities(url).await {
        Ok(capabilities) => Some(capabilities),
        Err(e) => {
            debug!(url, error = %e, "capabilities probe failed during preview");
            None
        }
    };

    Ok(RegistrationPreview { info, capabilities })
}
