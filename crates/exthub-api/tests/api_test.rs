//! End-to-end API tests over a live listener.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use exthub_api::{build_router, demo_extension_router, ServerState};
use exthub_core::{ExtensionInfo, ExtensionRecord, MemoryRegistry, RegistryStore};
use exthub_dispatch::{DispatchConfig, ExtensionClient};

const ADMIN_KEY: &str = "test-admin-key";

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_hub_with_registry(api_key: Option<&str>) -> (String, Arc<MemoryRegistry>) {
    let registry = Arc::new(MemoryRegistry::new());
    let client = Arc::new(
        ExtensionClient::new(DispatchConfig {
            probe_timeout_secs: 1,
            execute_timeout_secs: 1,
            connect_timeout_secs: 1,
        })
        .unwrap(),
    );
    let state = ServerState::new(registry.clone(), client, api_key.map(str::to_string));
    (spawn(build_router(state)).await, registry)
}

async fn spawn_hub(api_key: Option<&str>) -> String {
    spawn_hub_with_registry(api_key).await.0
}

/// A URL nothing listens on.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Reachable extension whose /info is missing `version`.
fn bad_metadata_extension() -> Router {
    Router::new()
        .route(
            "/info",
            get(|| async { Json(json!({"title": "Broken", "description": "no version"})) }),
        )
        .route("/capabilities", get(|| async { Json(json!([])) }))
}

async fn register(
    http: &reqwest::Client,
    hub: &str,
    name: &str,
    url: &str,
) -> reqwest::Response {
    http.post(format!("{hub}/api/extensions"))
        .header("X-API-Key", ADMIN_KEY)
        .json(&json!({"name": name, "url": url, "description": "test extension"}))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let body: Value = reqwest::get(format!("{hub}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn test_register_returns_created_record() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();

    // Trailing slash is normalized away.
    let response = register(&http, &hub, "expenses", &format!("{demo}/")).await;
    assert_eq!(response.status(), 201);

    let record: Value = response.json().await.unwrap();
    assert_eq!(record["name"], json!("expenses"));
    assert_eq!(record["title"], json!("Demo Expense Tracker"));
    assert_eq!(record["url"], json!(demo));
}

#[tokio::test]
async fn test_register_rejects_relative_url() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let http = reqwest::Client::new();

    let response = register(&http, &hub, "bad", "expenses.example.com").await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn test_register_unreachable_is_bad_gateway() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let http = reqwest::Client::new();

    let response = register(&http, &hub, "ghost", &dead_url().await).await;
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn test_register_invalid_metadata_is_unprocessable() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let broken = spawn(bad_metadata_extension()).await;
    let http = reqwest::Client::new();

    let response = register(&http, &hub, "broken", &broken).await;
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("version"));
}

#[tokio::test]
async fn test_register_duplicate_name_conflicts() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();

    assert_eq!(register(&http, &hub, "expenses", &demo).await.status(), 201);
    assert_eq!(register(&http, &hub, "expenses", &demo).await.status(), 409);
}

#[tokio::test]
async fn test_admin_routes_require_api_key() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();

    // Missing key.
    let response = http
        .post(format!("{hub}/api/extensions"))
        .json(&json!({"name": "x", "url": demo}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // Wrong key.
    let response = http
        .post(format!("{hub}/api/extensions"))
        .header("X-API-Key", "wrong")
        .json(&json!({"name": "x", "url": demo}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // No key configured at all: writes stay disabled even with a header.
    let locked_hub = spawn_hub(None).await;
    let response = http
        .post(format!("{locked_hub}/api/extensions"))
        .header("X-API-Key", ADMIN_KEY)
        .json(&json!({"name": "x", "url": demo}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_list_is_public_and_name_sorted() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();

    register(&http, &hub, "zeta", &demo).await;
    register(&http, &hub, "alpha", &demo).await;

    // No API key needed for reads.
    let records: Vec<Value> = reqwest::get(format!("{hub}/api/extensions"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], json!("alpha"));
    assert_eq!(records[1]["name"], json!("zeta"));
}

#[tokio::test]
async fn test_preview_route() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;

    let preview: Value = reqwest::get(format!("{hub}/api/extensions/register?url={demo}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(preview["info"]["title"], json!("Demo Expense Tracker"));
    let caps = preview["capabilities"].as_array().unwrap();
    assert!(caps.iter().any(|c| c["name"] == json!("add_expense")));

    // Bad URL fails before any probe.
    let response = reqwest::get(format!("{hub}/api/extensions/register?url=not-a-url"))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_execute_proxy_always_200_for_logical_outcomes() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();
    register(&http, &hub, "expenses", &demo).await;

    // Success; number types survive the round trip.
    let response = http
        .post(format!("{hub}/api/extensions/expenses/execute"))
        .json(&json!({"action": "add_expense", "parameters": {"amount": 14.50}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["amount"], json!(14.50));

    // Logical failure: still HTTP 200, envelope carries the error.
    let response = http
        .post(format!("{hub}/api/extensions/expenses/execute"))
        .json(&json!({"action": "frobnicate"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Unknown action: frobnicate"));

    // Unknown extension name is a hub-level 404.
    let response = http
        .post(format!("{hub}/api/extensions/nope/execute"))
        .json(&json!({"action": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_unregister() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();
    register(&http, &hub, "expenses", &demo).await;

    let response = http
        .delete(format!("{hub}/api/extensions/nope"))
        .header("X-API-Key", ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = http
        .delete(format!("{hub}/api/extensions/expenses"))
        .header("X-API-Key", ADMIN_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let records: Vec<Value> = reqwest::get(format!("{hub}/api/extensions"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_capability_aggregate_marks_liveness() {
    let (hub, registry) = spawn_hub_with_registry(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();
    register(&http, &hub, "expenses", &demo).await;

    // A record whose extension went away after registration: seed the
    // registry directly with a URL nothing listens on.
    let offline = ExtensionRecord::new(
        "offline",
        dead_url().await,
        "gone since registration",
        ExtensionInfo {
            title: "Offline".to_string(),
            description: "gone".to_string(),
            version: "1.0.0".to_string(),
            author: None,
            icon_url: None,
            homepage_url: None,
        },
    );
    registry.insert(offline).await.unwrap();

    let body: Value = reqwest::get(format!("{hub}/api/extensions/capabilities"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["expenses"]["status"], json!("online"));
    let caps = body["expenses"]["capabilities"].as_array().unwrap();
    assert_eq!(caps.len(), 3);
    assert_eq!(body["offline"]["status"], json!("unreachable"));
}

#[tokio::test]
async fn test_preflight_returns_no_content_with_cors_headers() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();

    // Demo extension endpoints answer preflight themselves.
    for (path, method) in [("capabilities", "GET"), ("execute", "POST")] {
        let response = http
            .request(reqwest::Method::OPTIONS, format!("{demo}/{path}"))
            .header("Origin", "http://agent.example.com")
            .header("Access-Control-Request-Method", method)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 204, "preflight for /{path}");
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "*"
        );
    }

    // Hub routes get the same treatment.
    let response = http
        .request(
            reqwest::Method::OPTIONS,
            format!("{hub}/api/extensions/x/execute"),
        )
        .header("Origin", "http://agent.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_reminders_scan() {
    let hub = spawn_hub(Some(ADMIN_KEY)).await;
    let demo = spawn(demo_extension_router()).await;
    let http = reqwest::Client::new();
    register(&http, &hub, "expenses", &demo).await;

    // Below threshold: nothing due.
    http.post(format!("{hub}/api/extensions/expenses/execute"))
        .json(&json!({"action": "add_expense", "parameters": {"amount": 12.0}}))
        .send()
        .await
        .unwrap();
    let items: Vec<Value> = reqwest::get(format!("{hub}/api/reminders"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(items.is_empty());

    // A large expense shows up in the scan.
    http.post(format!("{hub}/api/extensions/expenses/execute"))
        .json(&json!({"action": "add_expense", "parameters": {"amount": 250.0, "category": "other"}}))
        .send()
        .await
        .unwrap();
    let items: Vec<Value> = reqwest::get(format!("{hub}/api/reminders"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["extension"], json!("expenses"));
    assert_eq!(items[0]["record"]["id"], json!("exp-2"));
}
