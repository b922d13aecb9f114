// Quiz tools: fetch a quiz (opens the quiz widget) and submit answers

use crate::protocol::ToolSchema;
use crate::resources::QUIZ_WIDGET_URI;
use crate::tools::registry::parse_args;
use crate::tools::{json_schema_map, json_schema_object, json_schema_string, Tool, ToolError};
use coursegate_backend::api::quizzes::SubmitQuizRequest;
use coursegate_backend::BackendClient;
use serde::Deserialize;
use serde_json::Value;

pub const GET_QUIZ: &str = "get_quiz";

/// Tool to fetch a quiz and render it in the quiz widget
pub struct GetQuizTool;

#[derive(Debug, Deserialize)]
struct GetQuizArgs {
    quiz_id: String,
}

#[async_trait::async_trait]
impl Tool for GetQuizTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: GET_QUIZ.to_string(),
            description: "Get a quiz with its questions and show it as an interactive widget"
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "quiz_id": json_schema_string("The quiz ID to retrieve")
                }),
                vec!["quiz_id"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: GetQuizArgs = parse_args(arguments)?;
        Ok(backend.quizzes().get(&args.quiz_id).await?)
    }

    fn widget(&self) -> Option<&'static str> {
        Some(QUIZ_WIDGET_URI)
    }
}

/// Tool to submit quiz answers for scoring
pub struct SubmitQuizTool;

#[derive(Debug, Deserialize)]
struct SubmitQuizArgs {
    quiz_id: String,
    user_id: String,
    answers: Value,
}

#[async_trait::async_trait]
impl Tool for SubmitQuizTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "submit_quiz".to_string(),
            description: "Submit a learner's answers to a quiz and return the score".to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "quiz_id": json_schema_string("The quiz being answered"),
                    "user_id": json_schema_string("The learner submitting the answers"),
                    "answers": json_schema_map("Map of question ID to the chosen answer")
                }),
                vec!["quiz_id", "user_id", "answers"],
            ),
        }
    }

    async fn execute(&self, backend: &BackendClient, arguments: &Value) -> Result<Value, ToolError> {
        let args: SubmitQuizArgs = parse_args(arguments)?;
        let request = SubmitQuizRequest {
            user_id: args.user_id,
            answers: args.answers,
        };
        Ok(backend.quizzes().submit(&args.quiz_id, &request).await?)
    }
}
