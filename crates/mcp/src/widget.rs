//! Sandbox metadata the host needs to run a widget.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Domains a widget may talk to. Identical for every caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Origin the host serves widgets from.
    pub domain: String,
    pub script_domains: Vec<String>,
    pub connect_domains: Vec<String>,
    pub resource_domains: Vec<String>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            domain: "https://app.coursegate.dev".to_string(),
            script_domains: vec!["https://app.coursegate.dev".to_string()],
            connect_domains: vec!["https://api.coursegate.dev".to_string()],
            resource_domains: vec!["https://cdn.coursegate.dev".to_string()],
        }
    }
}

impl WidgetSettings {
    /// `_meta` block for a widget at `template_uri`.
    pub fn meta(&self, template_uri: &str, invoking: &str, invoked: &str) -> Value {
        json!({
            "openai/outputTemplate": template_uri,
            "openai/widgetDomain": self.domain,
            "openai/widgetCSP": {
                "script_domains": self.script_domains,
                "connect_domains": self.connect_domains,
                "resource_domains": self.resource_domains,
            },
            "openai/widgetAccessible": true,
            "openai/toolInvocation/invoking": invoking,
            "openai/toolInvocation/invoked": invoked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_keys() {
        let meta = WidgetSettings::default().meta("ui://widget/quiz.html", "Loading", "Ready");

        assert_eq!(meta["openai/outputTemplate"], "ui://widget/quiz.html");
        assert_eq!(meta["openai/widgetDomain"], "https://app.coursegate.dev");
        assert!(meta["openai/widgetCSP"]["connect_domains"].is_array());
        assert!(meta["openai/widgetCSP"]["script_domains"].is_array());
        assert!(meta["openai/widgetCSP"]["resource_domains"].is_array());
    }
}
