// Tier-gated tools: recommendations, knowledge gaps, open-answer grading

use crate::protocol::ToolSchema;
use crate::tools::registry::parse_args;
use crate::tools::{json_schema_object, json_schema_string, Tool, ToolError};
use coursegate_backend::api::adaptive::GradeAnswerRequest;
use coursegate_backend::{BackendClient, Tier};
use serde::Deserialize;
use serde_json::Value;

/// Tool to get personalised next-step recommendations
pub struct AdaptiveRecommendationsTool;

#[derive(Debug, Deserialize)]
struct LearnerArgs {
    user_id: String,
    #[serde(default)]
    chapter_id: Option<String>,
}

#[async_trait::async_trait]
impl Tool for AdaptiveRecommendationsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_adaptive_recommendations".to_string(),
            description: "Recommend what a learner should study next based on their results (Premium)"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "user_id": json_schema_string("The learner's user ID")
                }),
                vec!["user_id"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: LearnerArgs = parse_args(arguments)?;
        Ok(backend.adaptive().recommendations(&args.user_id).await?)
    }

    fn tier(&self) -> Option<Tier> {
        Some(Tier::Premium)
    }
}

/// Tool to analyse a learner's knowledge gaps
pub struct KnowledgeGapsTool;

#[async_trait::async_trait]
impl Tool for KnowledgeGapsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analyze_knowledge_gaps".to_string(),
            description: "Find the concepts a learner struggles with, optionally within one chapter (Premium)"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "user_id": json_schema_string("The learner's user ID"),
                    "chapter_id": json_schema_string("Optional chapter to restrict the analysis to")
                }),
                vec!["user_id"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: LearnerArgs = parse_args(arguments)?;
        Ok(backend
            .adaptive()
            .knowledge_gaps(&args.user_id, args.chapter_id.as_deref())
            .await?)
    }

    fn tier(&self) -> Option<Tier> {
        Some(Tier::Premium)
    }
}

/// Tool to grade a free-text answer
pub struct GradeOpenAnswerTool;

#[derive(Debug, Deserialize)]
struct GradeArgs {
    user_id: String,
    question_id: String,
    answer: String,
}

#[async_trait::async_trait]
impl Tool for GradeOpenAnswerTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "grade_open_answer".to_string(),
            description: "Grade a learner's free-text answer and explain the feedback (Pro)"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "user_id": json_schema_string("The learner's user ID"),
                    "question_id": json_schema_string("The open question being answered"),
                    "answer": json_schema_string("The learner's answer text")
                }),
                vec!["user_id", "question_id", "answer"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: GradeArgs = parse_args(arguments)?;
        let request = GradeAnswerRequest {
            user_id: args.user_id,
            question_id: args.question_id,
            answer: args.answer,
        };
        Ok(backend.adaptive().grade_open_answer(&request).await?)
    }

    fn tier(&self) -> Option<Tier> {
        Some(Tier::Pro)
    }
}
