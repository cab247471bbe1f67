//! Agent-facing tool surface for the hub.
//!
//! Exposes the dispatch layer to AI agents as chat-protocol tools:
//!
//! - `list_extensions` - discover every registered extension and the
//!   actions each one supports, with live capability data.
//! - `use_extension` - execute any action on any registered extension.
//! - `check_reminders` - surface due items across every participating
//!   extension.
//!
//! Tools return plain text the agent can read directly; the hub never
//! interprets extension payloads beyond formatting.

pub mod error;
pub mod hub_tools;
pub mod tool;

pub use error::{Result, ToolError};
pub use hub_tools::{CheckRemindersTool, HubToolset, ListExtensionsTool, UseExtensionTool};
pub use tool::{Tool, ToolOutput};
