//! Hub tools - expose the extension registry and dispatch layer to AI
//! agents as callable functions.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use exthub_core::{Capability, RegistryStore};
use exthub_dispatch::{Aggregator, CapabilityProbe, ExtensionClient};

use crate::error::Result;
use crate::tool::{Tool, ToolOutput};

fn format_parameter(param: &exthub_core::CapabilityParameter) -> String {
    let mut rendered = format!(
        "{}({}, {}",
        param.name,
        serde_json::to_value(param.param_type)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "string".to_string()),
        if param.required { "required" } else { "optional" }
    );
    if let Some(values) = &param.allowed_values {
        rendered.push_str(&format!(", one of: {}", values.join("|")));
    }
    if let Some(example) = &param.example {
        rendered.push_str(&format!(", e.g. {example}"));
    }
    rendered.push(')');
    rendered
}

fn format_capability(cap: &Capability) -> String {
    let params = if cap.parameters.is_empty() {
        "no params".to_string()
    } else {
        cap.parameters
            .iter()
            .map(format_parameter)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("    * {}: {} [{}]", cap.name, cap.description, params)
}

/// Lists every registered extension with its live capability data.
pub struct ListExtensionsTool {
    registry: Arc<dyn RegistryStore>,
    aggregator: Arc<Aggregator>,
}

impl ListExtensionsTool {
    /// Create the tool.
    pub fn new(registry: Arc<dyn RegistryStore>, aggregator: Arc<Aggregator>) -> Self {
        Self {
            registry,
            aggregator,
        }
    }
}

#[async_trait]
impl Tool for ListExtensionsTool {
    fn name(&self) -> &str {
        "list_extensions"
    }

    fn description(&self) -> &str {
        "List every registered extension and the actions each one supports. \
         Call this first to discover what you can do."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> Result<ToolOutput> {
        let records = self.registry.list().await?;
        if records.is_empty() {
            return Ok(ToolOutput::success(
                "No extensions registered yet. Register one via POST /api/extensions.",
            ));
        }

        let mut probes = self.aggregator.list_all_capabilities().await?;

        let mut sections = Vec::new();
        for record in records {
            let caps_text = match probes.remove(&record.name) {
                Some(CapabilityProbe::Online { capabilities }) if capabilities.is_empty() => {
                    "    (no capabilities returned)".to_string()
                }
                Some(CapabilityProbe::Online { capabilities }) => capabilities
                    .iter()
                    .map(format_capability)
                    .collect::<Vec<_>>()
                    .join("\n"),
                Some(CapabilityProbe::Unreachable { error }) => {
                    format!("    (could not fetch capabilities: {error})")
                }
                None => "    (could not fetch capabilities)".to_string(),
            };
            sections.push(format!("[{}] {}\n{}", record.name, record.description, caps_text));
        }

        Ok(ToolOutput::success(sections.join("\n\n")))
    }
}

/// Executes one action on one registered extension.
pub struct UseExtensionTool {
    registry: Arc<dyn RegistryStore>,
    client: Arc<ExtensionClient>,
}

impl UseExtensionTool {
    /// Create the tool.
    pub fn new(registry: Arc<dyn RegistryStore>, client: Arc<ExtensionClient>) -> Self {
        Self { registry, client }
    }
}

#[async_trait]
impl Tool for UseExtensionTool {
    fn name(&self) -> &str {
        "use_extension"
    }

    fn description(&self) -> &str {
        "Execute any action on any registered extension."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "extension": {
                    "type": "string",
                    "description": "The extension name (as shown in list_extensions)."
                },
                "action": {
                    "type": "string",
                    "description": "The action name to run."
                },
                "parameters": {
                    "type": "object",
                    "description": "Parameters for the action - use {} if none."
                }
            },
            "required": ["extension", "action", "parameters"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let extension = args["extension"].as_str().unwrap_or_default();
        let action = args["action"].as_str().unwrap_or_default();
        let parameters: Map<String, Value> = match args.get("parameters") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        let Some(record) = self.registry.get(extension).await? else {
            let known: Vec<String> = self
                .registry
                .list()
                .await?
                .into_iter()
                .map(|r| r.name)
                .collect();
            let known = if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            };
            return Ok(ToolOutput::success(format!(
                "Extension '{extension}' not found. Registered extensions: {known}"
            )));
        };

        debug!(extension, action, "agent dispatching action");
        let result = self.client.execute(&record.url, action, parameters).await;

        if !result.success {
            let error = result.error.unwrap_or_else(|| "Unknown error".to_string());
            return Ok(ToolOutput::success(format!("Error: {error}")));
        }

        let text = match result.data {
            Some(data) => serde_json::to_string_pretty(&data)?,
            None => "Done.".to_string(),
        };
        Ok(ToolOutput::success(text))
    }
}

/// Surfaces due items across every participating extension.
pub struct CheckRemindersTool {
    aggregator: Arc<Aggregator>,
}

impl CheckRemindersTool {
    /// Create the tool.
    pub fn new(aggregator: Arc<Aggregator>) -> Self {
        Self { aggregator }
    }
}

#[async_trait]
impl Tool for CheckRemindersTool {
    fn name(&self) -> &str {
        "check_reminders"
    }

    fn description(&self) -> &str {
        "Collect due and overdue items from every extension that supports \
         reminders. Call this at the start of a session to surface pending tasks."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> Result<ToolOutput> {
        let items = self.aggregator.collect_due_items().await?;
        if items.is_empty() {
            return Ok(ToolOutput::success("Nothing due across any extension."));
        }

        let lines: Vec<String> = items
            .iter()
            .map(|item| {
                let mut line = format!(
                    "[{}] {} @ {} (id: {})",
                    item.extension,
                    item.field("role"),
                    item.field("company"),
                    item.field("id")
                );
                if let Some(url) = item.link() {
                    line.push_str(&format!(" {url}"));
                }
                line
            })
            .collect();

        Ok(ToolOutput::success(lines.join("\n")))
    }
}

/// The hub's complete tool surface.
pub struct HubToolset {
    tools: Vec<Arc<dyn Tool>>,
}

impl HubToolset {
    /// Build the three hub tools over a registry and dispatch client.
    pub fn new(client: Arc<ExtensionClient>, registry: Arc<dyn RegistryStore>) -> Self {
        let aggregator = Arc::new(Aggregator::new(client.clone(), registry.clone()));
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(ListExtensionsTool::new(registry.clone(), aggregator.clone())),
            Arc::new(UseExtensionTool::new(registry, client)),
            Arc::new(CheckRemindersTool::new(aggregator)),
        ];
        Self { tools }
    }

    /// All tools.
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Look up one tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Format all tool definitions for LLM function calling APIs.
    pub fn definitions_for_llm(&self) -> Value {
        Value::Array(self.tools.iter().map(|t| t.definition()).collect())
    }
}
