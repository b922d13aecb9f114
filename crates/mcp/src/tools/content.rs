// Content tools: chapters and search

use crate::protocol::ToolSchema;
use crate::tools::registry::parse_args;
use crate::tools::{json_schema_object, json_schema_string, Tool, ToolError};
use coursegate_backend::BackendClient;
use serde::Deserialize;
use serde_json::Value;

/// Tool to list course chapters
pub struct ListChaptersTool;

#[async_trait::async_trait]
impl Tool for ListChaptersTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_chapters".to_string(),
            description: "List all chapters of the course with their titles and order".to_string(),
            input_schema: json_schema_object(serde_json::json!({}), vec![]),
        }
    }

    async fn execute(&self, backend: &BackendClient, _arguments: &Value) -> Result<Value, ToolError> {
        Ok(backend.content().list_chapters().await?)
    }
}

/// Tool to get one chapter
pub struct GetChapterTool;

#[derive(Debug, Deserialize)]
struct GetChapterArgs {
    chapter_id: String,
}

#[async_trait::async_trait]
impl Tool for GetChapterTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_chapter".to_string(),
            description: "Get the full content of a chapter by its ID".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "chapter_id": json_schema_string("The chapter ID to retrieve")
                }),
                vec!["chapter_id"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: GetChapterArgs = parse_args(arguments)?;
        Ok(backend.content().get_chapter(&args.chapter_id).await?)
    }
}

/// Tool to search course content
pub struct SearchContentTool;

#[derive(Debug, Deserialize)]
struct SearchContentArgs {
    query: String,
}

#[async_trait::async_trait]
impl Tool for SearchContentTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_content".to_string(),
            description: "Search chapters and lessons for a keyword or phrase".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "query": json_schema_string("Text to search for")
                }),
                vec!["query"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: SearchContentArgs = parse_args(arguments)?;
        if args.query.trim().is_empty() {
            return Err(ToolError::InvalidArguments("query must not be empty".to_string()));
        }
        Ok(backend.content().search(&args.query).await?)
    }
}
