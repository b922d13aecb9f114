//! Tool invocation: lookup, argument checks, tier gating, backend call and
//! mapping of every outcome into the one `tools/call` result shape.

use crate::gate::{GateDecision, TierGate};
use crate::protocol::{CallToolResult, ToolContent};
use crate::resources::ResourceCatalog;
use crate::tools::{validate_arguments, ToolError, ToolRegistry};
use coursegate_backend::{BackendClient, BackendError, Tier};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-call state. Lives for one `tools/call` and is then dropped.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub tool_name: String,
    pub arguments: Value,
    pub caller_tier: Option<Tier>,
}

/// Everything a tool call can end in. All variants render to the same
/// envelope and differ only in payload and the `isError` flag.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The backend answered 2xx.
    Success { body: Value, meta: Option<Value> },
    /// Unknown tool or unusable arguments.
    ToolError(String),
    /// Refused for tier reasons, by the gate or by the backend (403).
    /// Rendered as ordinary output so the host can offer an upgrade.
    TierDenied(Value),
    /// Not found, timeout, server error or unreachable backend.
    BackendFailure(String),
}

impl ToolOutcome {
    pub fn into_result(self) -> CallToolResult {
        match self {
            ToolOutcome::Success { body, meta } => CallToolResult {
                content: vec![ToolContent::json(&body)],
                structured_content: body.is_object().then(|| body.clone()),
                meta,
                is_error: None,
            },
            ToolOutcome::TierDenied(payload) => CallToolResult {
                content: vec![ToolContent::json(&payload)],
                structured_content: Some(payload),
                meta: None,
                is_error: None,
            },
            ToolOutcome::ToolError(message) | ToolOutcome::BackendFailure(message) => {
                CallToolResult {
                    content: vec![ToolContent::json(&json!({ "error": message }))],
                    structured_content: None,
                    meta: None,
                    is_error: Some(true),
                }
            }
        }
    }

    fn from_backend_error(err: BackendError, upgrade_url: &str) -> Self {
        match err {
            BackendError::Status {
                status: 403,
                message,
                ..
            } => ToolOutcome::TierDenied(json!({
                "error": message,
                "upgrade_url": upgrade_url,
            })),
            BackendError::Status {
                status: 404,
                message,
                ..
            } => ToolOutcome::BackendFailure(format!("Not found: {}", message)),
            BackendError::Status { status, message, .. } if status < 500 => {
                ToolOutcome::BackendFailure(format!(
                    "The course service rejected the request: {}",
                    message
                ))
            }
            BackendError::Timeout => ToolOutcome::BackendFailure(
                "The course service took too long to respond. Please try again.".to_string(),
            ),
            BackendError::MalformedBody(_) => ToolOutcome::BackendFailure(
                "The course service returned an unexpected response.".to_string(),
            ),
            _ => ToolOutcome::BackendFailure(
                "The course service is currently unavailable. Please try again later."
                    .to_string(),
            ),
        }
    }
}

/// Runs `tools/call` requests against the registry and backend.
#[derive(Clone)]
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    resources: Arc<ResourceCatalog>,
    gate: Arc<TierGate>,
    backend: BackendClient,
}

impl ToolInvoker {
    pub fn new(
        registry: Arc<ToolRegistry>,
        resources: Arc<ResourceCatalog>,
        gate: Arc<TierGate>,
        backend: BackendClient,
    ) -> Self {
        Self {
            registry,
            resources,
            gate,
            backend,
        }
    }

    /// Invoke a tool and render the outcome.
    pub async fn invoke(&self, tool_name: &str, arguments: Option<Value>) -> CallToolResult {
        let outcome = self.run(tool_name, arguments).await;
        match &outcome {
            ToolOutcome::Success { .. } => debug!(tool = %tool_name, "Tool call succeeded"),
            ToolOutcome::TierDenied(_) => debug!(tool = %tool_name, "Tool call denied by tier"),
            ToolOutcome::ToolError(msg) | ToolOutcome::BackendFailure(msg) => {
                warn!(tool = %tool_name, error = %msg, "Tool call failed")
            }
        }
        outcome.into_result()
    }

    /// Invoke a tool and return the raw outcome.
    pub async fn run(&self, tool_name: &str, arguments: Option<Value>) -> ToolOutcome {
        let Some(tool) = self.registry.get(tool_name) else {
            return ToolOutcome::ToolError(format!("Unknown tool: {}", tool_name));
        };

        let arguments = match arguments {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(args) => args,
        };

        if let Some(schema) = self.registry.schema(tool_name) {
            if let Err(reason) = validate_arguments(&schema.input_schema, &arguments) {
                return ToolOutcome::ToolError(format!(
                    "Invalid arguments for {}: {}",
                    tool_name, reason
                ));
            }
        }

        let mut ctx = InvocationContext {
            tool_name: tool_name.to_string(),
            arguments,
            caller_tier: None,
        };

        if self.gate.is_gated(&ctx.tool_name) {
            if let GateDecision::Deny(denial) = self.gate.precheck(&ctx.tool_name) {
                return ToolOutcome::TierDenied(denial.to_payload());
            }

            let tier = self.resolve_tier(&ctx).await;
            ctx.caller_tier = Some(tier);

            if let GateDecision::Deny(denial) = self.gate.evaluate(&ctx.tool_name, tier) {
                return ToolOutcome::TierDenied(denial.to_payload());
            }
        }

        debug!(tool = %ctx.tool_name, tier = ?ctx.caller_tier, "Calling backend");

        match tool.execute(&self.backend, &ctx.arguments).await {
            Ok(body) => ToolOutcome::Success {
                meta: tool.widget().and_then(|uri| self.resources.widget_meta(uri)),
                body,
            },
            Err(ToolError::InvalidArguments(reason)) => ToolOutcome::ToolError(format!(
                "Invalid arguments for {}: {}",
                ctx.tool_name, reason
            )),
            Err(ToolError::Backend(err)) => {
                warn!(tool = %ctx.tool_name, error = %err, "Backend call failed");
                ToolOutcome::from_backend_error(err, self.gate.upgrade_url())
            }
        }
    }

    /// Ask the access service for the caller's tier. Any failure counts as
    /// the lowest tier.
    async fn resolve_tier(&self, ctx: &InvocationContext) -> Tier {
        let Some(user_id) = ctx.arguments.get("user_id").and_then(Value::as_str) else {
            return Tier::Free;
        };

        match self
            .backend
            .access()
            .check(user_id, Some(&ctx.tool_name))
            .await
        {
            Ok(access) => access.tier,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "Access check failed, assuming free tier");
                Tier::Free
            }
        }
    }
}
