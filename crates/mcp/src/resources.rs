//! Static widget resources served by URI.
//!
//! Payloads are compiled into the binary and never templated; widgets
//! personalise themselves from the tool output the host injects.

use crate::protocol::{
    ListResourcesResult, ReadResourceResult, ResourceContents, ResourceSchema,
};
use crate::widget::WidgetSettings;
use serde_json::Value;

pub const QUIZ_WIDGET_URI: &str = "ui://widget/quiz.html";
pub const PROGRESS_WIDGET_URI: &str = "ui://widget/progress.html";

/// MIME type hosts expect for sandboxed HTML widgets.
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";

const QUIZ_WIDGET_HTML: &str = include_str!("../widgets/quiz.html");
const PROGRESS_WIDGET_HTML: &str = include_str!("../widgets/progress.html");

/// One registered resource.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub payload: &'static str,
    /// Status lines the host shows while a tool opening this widget runs.
    pub invoking: &'static str,
    pub invoked: &'static str,
}

/// Read-only resource catalog.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    entries: Vec<ResourceEntry>,
    widget: WidgetSettings,
}

impl ResourceCatalog {
    pub fn new(entries: Vec<ResourceEntry>, widget: WidgetSettings) -> Self {
        Self { entries, widget }
    }

    /// The quiz and progress widgets.
    pub fn course_widgets(widget: WidgetSettings) -> Self {
        Self::new(
            vec![
                ResourceEntry {
                    uri: QUIZ_WIDGET_URI,
                    name: "Quiz",
                    description: "Interactive multiple-choice quiz",
                    mime_type: WIDGET_MIME_TYPE,
                    payload: QUIZ_WIDGET_HTML,
                    invoking: "Preparing quiz",
                    invoked: "Quiz ready",
                },
                ResourceEntry {
                    uri: PROGRESS_WIDGET_URI,
                    name: "Progress",
                    description: "Chapter progress and streak dashboard",
                    mime_type: WIDGET_MIME_TYPE,
                    payload: PROGRESS_WIDGET_HTML,
                    invoking: "Loading progress",
                    invoked: "Progress loaded",
                },
            ],
            widget,
        )
    }

    pub fn get(&self, uri: &str) -> Option<&ResourceEntry> {
        self.entries.iter().find(|e| e.uri == uri)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sandbox metadata for a registered resource.
    pub fn widget_meta(&self, uri: &str) -> Option<Value> {
        self.get(uri)
            .map(|entry| self.widget.meta(entry.uri, entry.invoking, entry.invoked))
    }

    pub fn list(&self) -> ListResourcesResult {
        ListResourcesResult {
            resources: self
                .entries
                .iter()
                .map(|e| ResourceSchema {
                    uri: e.uri.to_string(),
                    name: e.name.to_string(),
                    description: e.description.to_string(),
                    mime_type: e.mime_type.to_string(),
                })
                .collect(),
        }
    }

    /// Exact-match read. Unknown URIs get a not-found payload, not an error.
    pub fn read(&self, uri: &str) -> ReadResourceResult {
        match self.get(uri) {
            Some(entry) => ReadResourceResult {
                contents: vec![ResourceContents {
                    uri: entry.uri.to_string(),
                    mime_type: entry.mime_type.to_string(),
                    text: entry.payload.to_string(),
                    meta: self.widget_meta(entry.uri),
                }],
                is_error: None,
            },
            None => {
                tracing::warn!(uri = %uri, "Resource not found");
                Self::not_found(uri)
            }
        }
    }

    pub(crate) fn not_found(uri: &str) -> ReadResourceResult {
        ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: "text/plain".to_string(),
                text: format!("Resource not found: {}", uri),
                meta: None,
            }],
            is_error: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ResourceCatalog {
        ResourceCatalog::course_widgets(WidgetSettings::default())
    }

    #[test]
    fn test_read_known_widget() {
        let result = catalog().read(QUIZ_WIDGET_URI);

        assert_eq!(result.contents.len(), 1);
        let item = &result.contents[0];
        assert_eq!(item.uri, QUIZ_WIDGET_URI);
        assert_eq!(item.mime_type, WIDGET_MIME_TYPE);
        assert!(item.text.contains("<html"));
        assert!(result.is_error.is_none());
    }

    #[test]
    fn test_read_reports_sandbox_metadata() {
        let result = catalog().read(PROGRESS_WIDGET_URI);
        let meta = result.contents[0].meta.as_ref().unwrap();

        assert_eq!(meta["openai/outputTemplate"], PROGRESS_WIDGET_URI);
        assert!(meta.get("openai/widgetCSP").is_some());
    }

    #[test]
    fn test_read_is_exact_match() {
        let result = catalog().read("ui://widget/quiz.html?user=U1");

        assert_eq!(result.is_error, Some(true));
        assert!(result.contents[0].text.contains("not found"));
    }

    #[test]
    fn test_read_is_caller_independent() {
        let catalog = catalog();
        let a = serde_json::to_value(catalog.read(QUIZ_WIDGET_URI)).unwrap();
        let b = serde_json::to_value(catalog.read(QUIZ_WIDGET_URI)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_list() {
        let listed = catalog().list();
        let uris: Vec<_> = listed.resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec![QUIZ_WIDGET_URI, PROGRESS_WIDGET_URI]);
    }
}
