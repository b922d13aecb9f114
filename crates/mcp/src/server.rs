// MCP gateway: wires the registry, gate, invoker and channels together

use crate::dispatcher::Dispatcher;
use crate::gate::TierGate;
use crate::invoker::ToolInvoker;
use crate::notifications::{NotificationChannel, DEFAULT_KEEP_ALIVE};
use crate::protocol::{JsonRpcResponse, ListToolsResult, ServerInfo};
use crate::resources::ResourceCatalog;
use crate::tools::{course_registry, ToolRegistry};
use crate::widget::WidgetSettings;
use coursegate_backend::BackendClient;
use futures::Stream;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Gateway-level settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub server_name: String,
    pub server_version: String,
    /// Platform-wide switch for tier-gated tools.
    pub advanced_enabled: bool,
    pub upgrade_url: String,
    pub widget: WidgetSettings,
    pub keep_alive: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            server_name: "coursegate".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            advanced_enabled: false,
            upgrade_url: "https://app.coursegate.dev/upgrade".to_string(),
            widget: WidgetSettings::default(),
            keep_alive: DEFAULT_KEEP_ALIVE,
        }
    }
}

pub struct McpServer {
    dispatcher: Dispatcher,
    notifications: NotificationChannel,
}

impl McpServer {
    /// Gateway over the standard course catalog.
    pub fn new(settings: GatewaySettings, backend: BackendClient) -> Self {
        Self::with_registry(settings, backend, course_registry())
    }

    pub fn with_registry(
        settings: GatewaySettings,
        backend: BackendClient,
        registry: ToolRegistry,
    ) -> Self {
        let server_info = ServerInfo {
            name: settings.server_name,
            version: settings.server_version,
        };
        let registry = Arc::new(registry);
        let resources = Arc::new(ResourceCatalog::course_widgets(settings.widget));
        let gate = Arc::new(TierGate::from_registry(
            &registry,
            settings.advanced_enabled,
            settings.upgrade_url,
        ));

        let invoker = ToolInvoker::new(registry.clone(), resources.clone(), gate, backend);
        let notifications = NotificationChannel::new(
            server_info.clone(),
            ListToolsResult {
                tools: registry.list_schemas(),
            },
            resources.list(),
            settings.keep_alive,
        );
        let dispatcher = Dispatcher::new(server_info, registry.clone(), resources, invoker);

        tracing::info!(
            tools = registry.len(),
            advanced_enabled = settings.advanced_enabled,
            "MCP gateway ready"
        );

        Self {
            dispatcher,
            notifications,
        }
    }

    /// Handle one JSON-RPC message. `None` means the message was a
    /// notification and nothing should be sent back.
    pub async fn handle_message(&self, raw: &[u8]) -> Option<JsonRpcResponse> {
        self.dispatcher.handle_bytes(raw).await
    }

    /// Open the SSE notification stream for one connection.
    pub fn open_notifications(
        &self,
        connection_id: String,
        shutdown: CancellationToken,
    ) -> impl Stream<Item = String> + Send + 'static {
        self.notifications.open(connection_id, shutdown)
    }
}
