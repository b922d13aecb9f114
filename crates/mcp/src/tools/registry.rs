// MCP tool trait and the static tool registry

use crate::protocol::ToolSchema;
use coursegate_backend::{BackendClient, BackendError, Tier};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Why a single tool execution failed.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Tool executor trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool schema for MCP
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with already-validated arguments
    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError>;

    /// Minimum subscription tier, `None` for tools open to everyone
    fn tier(&self) -> Option<Tier> {
        None
    }

    /// URI of the widget a successful result should open
    fn widget(&self) -> Option<&'static str> {
        None
    }
}

/// Decode validated arguments into a tool's typed argument struct.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: &Value) -> Result<T, ToolError> {
    T::deserialize(arguments).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

struct Entry {
    schema: ToolSchema,
    tool: Arc<dyn Tool>,
}

/// Tool registry, built once at startup and only read afterwards.
/// Iteration follows registration order.
pub struct ToolRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. A second tool with the same name replaces the first.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        match self.index.get(&schema.name) {
            Some(&slot) => {
                tracing::warn!(tool = %schema.name, "Replacing already registered tool");
                self.entries[slot] = Entry { schema, tool };
            }
            None => {
                self.index.insert(schema.name.clone(), self.entries.len());
                self.entries.push(Entry { schema, tool });
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&slot| self.entries[slot].tool.clone())
    }

    /// Get a tool's schema by name
    pub fn schema(&self, name: &str) -> Option<&ToolSchema> {
        self.index.get(name).map(|&slot| &self.entries[slot].schema)
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.entries.iter().map(|e| e.schema.clone()).collect()
    }

    /// Minimum tier of every gated tool
    pub fn tier_requirements(&self) -> impl Iterator<Item = (&str, Tier)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.tool.tier().map(|tier| (e.schema.name.as_str(), tier)))
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_map(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "description": description
    })
}
