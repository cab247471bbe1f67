//! Cross-extension scans.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;

use exthub_dispatch::{CapabilityProbe, DueItem};

use crate::models::HandlerResult;
use crate::server::ServerState;

/// `GET /api/extensions/capabilities` - live capability map with
/// per-extension liveness status.
pub async fn list_capabilities_handler(
    State(state): State<ServerState>,
) -> HandlerResult<Json<HashMap<String, CapabilityProbe>>> {
    Ok(Json(state.aggregator.list_all_capabilities().await?))
}

/// `GET /api/reminders` - due items from every participating extension.
pub async fn list_reminders_handler(
    State(state): State<ServerState>,
) -> HandlerResult<Json<Vec<DueItem>>> {
    Ok(Json(state.aggregator.collect_due_items().await?))
}
