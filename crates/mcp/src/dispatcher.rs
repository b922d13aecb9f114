//! JSON-RPC envelope parsing and method routing.
//!
//! Only malformed envelopes and unknown methods become JSON-RPC errors.
//! Failures inside `tools/call` and `resources/read` come back as successful
//! responses with an error-flagged payload.

use crate::invoker::ToolInvoker;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ReadResourceParams, ServerInfo, ToolContent,
    JSONRPC_VERSION,
};
use crate::resources::ResourceCatalog;
use crate::tools::ToolRegistry;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// The methods the gateway understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    Initialized,
    Ping,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    Unknown(String),
}

impl Method {
    pub fn parse(name: &str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "notifications/initialized" => Method::Initialized,
            "ping" => Method::Ping,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            "resources/list" => Method::ResourcesList,
            "resources/read" => Method::ResourcesRead,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Initialize => "initialize",
            Method::Initialized => "notifications/initialized",
            Method::Ping => "ping",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::ResourcesList => "resources/list",
            Method::ResourcesRead => "resources/read",
            Method::Unknown(name) => name,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless request router. Cheap to clone and share across tasks.
#[derive(Clone)]
pub struct Dispatcher {
    server_info: ServerInfo,
    registry: Arc<ToolRegistry>,
    resources: Arc<ResourceCatalog>,
    invoker: ToolInvoker,
}

impl Dispatcher {
    pub fn new(
        server_info: ServerInfo,
        registry: Arc<ToolRegistry>,
        resources: Arc<ResourceCatalog>,
        invoker: ToolInvoker,
    ) -> Self {
        Self {
            server_info,
            registry,
            resources,
            invoker,
        }
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        match serde_json::from_slice::<Value>(raw) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                debug!(error = %e, "Unparseable JSON-RPC message");
                Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
            }
        }
    }

    /// Validate an envelope and dispatch it.
    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        match parse_envelope(value) {
            Ok(request) => self.dispatch(request).await,
            Err((id, error)) => {
                warn!(code = error.code, message = %error.message, "Rejected JSON-RPC envelope");
                Some(JsonRpcResponse::error(id, error))
            }
        }
    }

    /// Route a well-formed request.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let method = Method::parse(&request.method);

        if request.is_notification() {
            debug!(method = %method, "Received notification");
            return None;
        }

        let id = request.id.unwrap_or(Value::Null);
        let params = request.params.unwrap_or(Value::Null);

        debug!(method = %method, id = %id, "MCP call");

        let response = match method {
            Method::Initialize => {
                JsonRpcResponse::success(id, InitializeResult::new(self.server_info.clone()))
            }
            Method::Initialized | Method::Ping => JsonRpcResponse::success(id, json!({})),
            Method::ToolsList => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            Method::ToolsCall => JsonRpcResponse::success(id, self.call_tool(params).await),
            Method::ResourcesList => JsonRpcResponse::success(id, self.resources.list()),
            Method::ResourcesRead => {
                let result = match serde_json::from_value::<ReadResourceParams>(params) {
                    Ok(params) => self.resources.read(&params.uri),
                    Err(_) => ResourceCatalog::not_found(""),
                };
                JsonRpcResponse::success(id, result)
            }
            Method::Unknown(name) => {
                warn!(method = %name, "Unknown method");
                JsonRpcResponse::error(id, JsonRpcError::method_not_found(&name))
            }
        };

        Some(response)
    }

    async fn call_tool(&self, params: Value) -> CallToolResult {
        match serde_json::from_value::<CallToolParams>(params) {
            Ok(params) => self.invoker.invoke(&params.name, params.arguments).await,
            Err(e) => CallToolResult {
                content: vec![ToolContent::json(&json!({
                    "error": format!("Invalid tools/call params: {}", e),
                }))],
                is_error: Some(true),
                ..Default::default()
            },
        }
    }
}

/// Check the envelope fields by hand so a bad envelope can still be answered
/// with whatever id it carried.
fn parse_envelope(value: Value) -> Result<JsonRpcRequest, (Value, JsonRpcError)> {
    let Value::Object(mut obj) = value else {
        return Err((
            Value::Null,
            JsonRpcError::invalid_request("expected a single JSON object"),
        ));
    };

    let id = match obj.remove("id") {
        None | Some(Value::Null) => None,
        Some(id @ (Value::String(_) | Value::Number(_))) => Some(id),
        Some(_) => {
            return Err((
                Value::Null,
                JsonRpcError::invalid_request("id must be a string, number or null"),
            ))
        }
    };
    let reply_id = id.clone().unwrap_or(Value::Null);

    if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err((reply_id, JsonRpcError::invalid_request("jsonrpc must be \"2.0\"")));
    }

    let method = match obj.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        _ => {
            return Err((
                reply_id,
                JsonRpcError::invalid_request("method must be a non-empty string"),
            ))
        }
    };

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id,
        method,
        params: obj.remove("params"),
    })
}
