//! Registry CRUD and the execute proxy.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

use exthub_core::{ExecuteResult, ExtensionRecord, HubError};
use exthub_dispatch::{validate_and_preview, RegistrationPreview};

use crate::models::{ErrorResponse, HandlerResult};
use crate::server::ServerState;

/// Body for `POST /api/extensions`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Unique registry name for the extension.
    pub name: String,
    /// Base URL of the deployed extension.
    pub url: String,
    /// Optional registrar-supplied description.
    #[serde(default)]
    pub description: String,
}

/// Query for `GET /api/extensions/register`.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Base URL to probe.
    pub url: String,
}

/// Body for `POST /api/extensions/{name}/execute`.
#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    /// Action name to run.
    pub action: String,
    /// Action parameters. Defaults to `{}`.
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

fn check_url(url: &str) -> HandlerResult<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ErrorResponse::bad_request(format!(
            "invalid extension url: '{url}' is not an absolute http(s) URL"
        )));
    }
    Ok(())
}

/// `GET /api/extensions` - all registered extensions, name-sorted.
pub async fn list_extensions_handler(
    State(state): State<ServerState>,
) -> HandlerResult<Json<Vec<ExtensionRecord>>> {
    Ok(Json(state.registry.list().await?))
}

/// `GET /api/extensions/register?url=` - server-side registration
/// preview.
///
/// Probing happens from the hub, so extensions on private networks the
/// registrar's browser cannot reach still get a preview.
pub async fn preview_extension_handler(
    State(state): State<ServerState>,
    Query(query): Query<PreviewQuery>,
) -> HandlerResult<Json<RegistrationPreview>> {
    let url = query.url.trim_end_matches('/');
    check_url(url)?;

    let preview = validate_and_preview(&state.client, url).await?;
    Ok(Json(preview))
}

/// `POST /api/extensions` - validate and persist a registration.
pub async fn register_extension_handler(
    State(state): State<ServerState>,
    Json(body): Json<RegisterRequest>,
) -> HandlerResult<(StatusCode, Json<ExtensionRecord>)> {
    if body.name.is_empty() {
        return Err(ErrorResponse::bad_request("extension name cannot be empty"));
    }
    let url = body.url.trim_end_matches('/');
    check_url(url)?;

    // Gate on the live /info contract before touching the registry.
    let preview = validate_and_preview(&state.client, url).await?;
    let record = ExtensionRecord::new(body.name, url, body.description, preview.info);

    state.registry.insert(record.clone()).await?;
    info!(name = %record.name, url = %record.url, "extension registered");

    Ok((StatusCode::CREATED, Json(record)))
}

/// `DELETE /api/extensions/{name}`
pub async fn unregister_extension_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> HandlerResult<StatusCode> {
    if !state.registry.remove(&name).await? {
        return Err(HubError::NotFound(name).into());
    }
    info!(name = %name, "extension unregistered");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/extensions/{name}/execute` - forward one action.
///
/// Always HTTP 200 with the success/error envelope once the name
/// resolves; only an unknown name is a hub-level error.
pub async fn execute_extension_handler(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Json(body): Json<ExecuteBody>,
) -> HandlerResult<Json<ExecuteResult>> {
    let Some(record) = state.registry.get(&name).await? else {
        return Err(HubError::NotFound(name).into());
    };

    let result = state
        .client
        .execute(&record.url, &body.action, body.parameters)
        .await;
    Ok(Json(result))
}
