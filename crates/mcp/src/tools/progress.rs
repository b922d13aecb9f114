// Progress tools: progress (opens the progress widget), streaks and access lookups

use crate::protocol::ToolSchema;
use crate::resources::PROGRESS_WIDGET_URI;
use crate::tools::registry::parse_args;
use crate::tools::{json_schema_number, json_schema_object, json_schema_string, Tool, ToolError};
use coursegate_backend::BackendClient;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct LearnerArgs {
    user_id: String,
}

fn learner_schema() -> Value {
    json_schema_object(
        serde_json::json!({
            "user_id": json_schema_string("The learner's user ID")
        }),
        vec!["user_id"],
    )
}

/// Tool to get a learner's progress
pub struct GetProgressTool;

#[async_trait::async_trait]
impl Tool for GetProgressTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_progress".to_string(),
            description: "Get a learner's progress through the course chapters".to_string(),
            input_schema: learner_schema(),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: LearnerArgs = parse_args(arguments)?;
        Ok(backend.progress().get(&args.user_id).await?)
    }

    fn widget(&self) -> Option<&'static str> {
        Some(PROGRESS_WIDGET_URI)
    }
}

/// Tool to record chapter progress
pub struct UpdateProgressTool;

#[async_trait::async_trait]
impl Tool for UpdateProgressTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "update_progress".to_string(),
            description: "Record that a learner started or completed a chapter".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "user_id": json_schema_string("The learner's user ID"),
                    "chapter_id": json_schema_string("The chapter the progress applies to"),
                    "status": json_schema_string("One of not_started, in_progress, completed"),
                    "score": json_schema_number("Optional score for the chapter")
                }),
                vec!["user_id", "chapter_id"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: LearnerArgs = parse_args(arguments)?;
        // the whole argument object is the update body
        Ok(backend.progress().update(&args.user_id, arguments).await?)
    }
}

/// Tool to get a learner's streak
pub struct GetStreakTool;

#[async_trait::async_trait]
impl Tool for GetStreakTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_streak".to_string(),
            description: "Get a learner's current and longest daily learning streak".to_string(),
            input_schema: learner_schema(),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: LearnerArgs = parse_args(arguments)?;
        Ok(backend.progress().streak(&args.user_id).await?)
    }
}

/// Tool to look up a learner's subscription tier
pub struct CheckAccessTool;

#[derive(Debug, Deserialize)]
struct CheckAccessArgs {
    user_id: String,
    #[serde(default)]
    feature: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CheckAccessTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "check_access".to_string(),
            description: "Check a learner's subscription tier and access to a feature".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "user_id": json_schema_string("The learner's user ID"),
                    "feature": json_schema_string("Optional feature name to check")
                }),
                vec!["user_id"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: CheckAccessArgs = parse_args(arguments)?;
        Ok(backend
            .access()
            .check_raw(&args.user_id, args.feature.as_deref())
            .await?)
    }
}
