//! In-process demo extension.
//!
//! A small expense tracker implementing the three-endpoint extension
//! contract. The CLI mounts it behind `serve --with-demo` so a fresh
//! install has something to register; the integration tests use it as
//! a protocol-conformant peer.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use exthub_core::{
    Capability, CapabilityParameter, ExecuteRequest, ExecuteResult, ExtensionInfo, ParameterType,
};

/// Expenses above this amount show up in the reminders scan.
const REVIEW_THRESHOLD: f64 = 100.0;

#[derive(Default)]
struct DemoState {
    expenses: RwLock<Vec<Value>>,
}

/// Build the demo extension router.
///
/// Standalone CORS so hub pages can call the demo cross-origin, same as
/// any independently deployed extension would.
pub fn demo_extension_router() -> Router {
    Router::new()
        .route("/info", get(info_handler))
        .route("/capabilities", get(capabilities_handler))
        .route("/execute", post(execute_handler))
        .layer(crate::cors::cors_layer())
        .layer(axum::middleware::from_fn(crate::cors::preflight_status))
        .with_state(Arc::new(DemoState::default()))
}

async fn info_handler() -> Json<ExtensionInfo> {
    Json(ExtensionInfo {
        title: "Demo Expense Tracker".to_string(),
        description: "Track expenses and flag large ones for review".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        author: Some("Exthub".to_string()),
        icon_url: None,
        homepage_url: None,
    })
}

async fn capabilities_handler() -> Json<Vec<Capability>> {
    Json(vec![
        Capability {
            name: "add_expense".to_string(),
            description: "Record a new expense".to_string(),
            parameters: vec![
                CapabilityParameter::new("amount", ParameterType::Number)
                    .required()
                    .with_description("Amount spent")
                    .with_example("14.50"),
                CapabilityParameter::new("category", ParameterType::String)
                    .with_description("Spending category")
                    .with_enum(vec![
                        "food".to_string(),
                        "transport".to_string(),
                        "entertainment".to_string(),
                        "other".to_string(),
                    ]),
                CapabilityParameter::new("description", ParameterType::String)
                    .with_description("Free-form note"),
            ],
        },
        Capability {
            name: "list_expenses".to_string(),
            description: "List all recorded expenses with the running total".to_string(),
            parameters: vec![],
        },
        Capability {
            name: "get_reminders".to_string(),
            description: "Large expenses pending review".to_string(),
            parameters: vec![],
        },
    ])
}

async fn execute_handler(
    State(state): State<Arc<DemoState>>,
    Json(req): Json<ExecuteRequest>,
) -> Json<ExecuteResult> {
    let result = match req.action.as_str() {
        "add_expense" => add_expense(&state, &req).await,
        "list_expenses" => list_expenses(&state).await,
        "get_reminders" => get_reminders(&state).await,
        other => ExecuteResult::fail(format!("Unknown action: {other}")),
    };
    Json(result)
}

async fn add_expense(state: &DemoState, req: &ExecuteRequest) -> ExecuteResult {
    let Some(amount) = req.parameters.get("amount").and_then(Value::as_f64) else {
        return ExecuteResult::fail("Missing required parameter: amount");
    };
    let category = req
        .parameters
        .get("category")
        .and_then(Value::as_str)
        .unwrap_or("other");
    let description = req
        .parameters
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let mut expenses = state.expenses.write().await;
    let entry = json!({
        "id": format!("exp-{}", expenses.len() + 1),
        "amount": amount,
        "category": category,
        "description": description,
    });
    expenses.push(entry.clone());

    ExecuteResult::ok(entry)
}

async fn list_expenses(state: &DemoState) -> ExecuteResult {
    let expenses = state.expenses.read().await;
    let total: f64 = expenses
        .iter()
        .filter_map(|e| e.get("amount").and_then(Value::as_f64))
        .sum();

    ExecuteResult::ok(json!({
        "expenses": expenses.clone(),
        "total": total,
    }))
}

async fn get_reminders(state: &DemoState) -> ExecuteResult {
    let expenses = state.expenses.read().await;
    let items: Vec<Value> = expenses
        .iter()
        .filter(|e| {
            e.get("amount")
                .and_then(Value::as_f64)
                .is_some_and(|amount| amount >= REVIEW_THRESHOLD)
        })
        .map(|e| {
            json!({
                "id": e["id"],
                "role": "Review large expense",
                "company": e["category"],
            })
        })
        .collect();

    ExecuteResult::ok(Value::Array(items))
}
