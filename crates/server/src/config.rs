use anyhow::{Context, Result};
use coursegate_backend::{BackendClient, ClientConfig, Url};
use coursegate_mcp::widget::WidgetSettings;
use coursegate_mcp::{GatewaySettings, McpServer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub features: FeatureConfig,

    #[serde(default)]
    pub tiers: TierConfig,

    #[serde(default)]
    pub widget: WidgetSettings,

    #[serde(default)]
    pub sse: SseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_llm_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            llm_timeout_secs: default_llm_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Enables the tier-gated adaptive and grading tools.
    #[serde(default)]
    pub advanced_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    #[serde(default = "default_upgrade_url")]
    pub upgrade_url: String,
}

fn default_upgrade_url() -> String {
    "https://app.coursegate.dev/upgrade".to_string()
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            upgrade_url: default_upgrade_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

fn default_keep_alive_secs() -> u64 {
    30
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend.timeout_secs == 0 || self.backend.llm_timeout_secs == 0 {
            anyhow::bail!("backend timeouts must be greater than zero");
        }
        if self.sse.keep_alive_secs == 0 {
            anyhow::bail!("sse.keep_alive_secs must be greater than zero");
        }
        Ok(())
    }

    /// Backend client configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let base_url = url_parse(&self.backend.base_url)?;
        let mut config = ClientConfig::new(base_url);
        config.api_key = self.backend.api_key.clone();
        config.timeout = Duration::from_secs(self.backend.timeout_secs);
        config.llm_timeout = Duration::from_secs(self.backend.llm_timeout_secs);
        Ok(config)
    }

    /// Gateway settings
    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            server_name: "coursegate".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            advanced_enabled: self.features.advanced_enabled,
            upgrade_url: self.tiers.upgrade_url.clone(),
            widget: self.widget.clone(),
            keep_alive: Duration::from_secs(self.sse.keep_alive_secs),
        }
    }
}

fn url_parse(raw: &str) -> Result<Url> {
    Url::parse(raw).with_context(|| format!("Invalid backend base_url: {}", raw))
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
    /// Cancelled on shutdown; closes every open SSE stream.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: &ServerConfig, shutdown: CancellationToken) -> Result<Self> {
        let backend = BackendClient::from_config(config.client_config()?)
            .context("Failed to create backend client")?;

        let mcp = Arc::new(McpServer::new(config.gateway_settings(), backend));

        Ok(Self { mcp, shutdown })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();

        assert_eq!(config.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.backend.llm_timeout_secs, 60);
        assert!(!config.features.advanced_enabled);
        assert_eq!(config.sse.keep_alive_secs, 30);
    }

    #[test]
    fn test_parse_partial_file() {
        let config: ServerConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://content.internal:9000/api/"

            [features]
            advanced_enabled = true

            [widget]
            domain = "https://widgets.example.com"
            script_domains = ["https://widgets.example.com"]
            connect_domains = []
            resource_domains = ["https://cdn.example.com"]
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://content.internal:9000/api/");
        assert_eq!(config.backend.timeout_secs, 10);
        assert!(config.features.advanced_enabled);
        assert_eq!(config.widget.domain, "https://widgets.example.com");
        assert_eq!(config.tiers.upgrade_url, "https://app.coursegate.dev/upgrade");
    }

    #[test]
    fn test_client_config_conversion() {
        let mut config = ServerConfig::default();
        config.backend.api_key = Some("sk-test".to_string());
        config.backend.llm_timeout_secs = 90;

        let client = config.client_config().unwrap();
        assert_eq!(client.api_key.as_deref(), Some("sk-test"));
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.llm_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_bad_backend_url() {
        let mut config = ServerConfig::default();
        config.backend.base_url = "::nope::".to_string();
        assert!(config.client_config().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = ServerConfig::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load(Path::new("/nonexistent/coursegate.toml")).unwrap();
        assert_eq!(config.sse.keep_alive_secs, 30);
    }
}
