pub mod adaptive;
pub mod content;
pub mod progress;
pub mod quiz;
mod registry;
mod validate;

pub use adaptive::{AdaptiveRecommendationsTool, GradeOpenAnswerTool, KnowledgeGapsTool};
pub use content::{GetChapterTool, ListChaptersTool, SearchContentTool};
pub use progress::{CheckAccessTool, GetProgressTool, GetStreakTool, UpdateProgressTool};
pub use quiz::{GetQuizTool, SubmitQuizTool};
pub use registry::{
    json_schema_map, json_schema_number, json_schema_object, json_schema_string, Tool, ToolError,
    ToolRegistry,
};
pub use validate::validate_arguments;

use std::sync::Arc;

/// The course catalog served by the gateway, in `tools/list` order.
pub fn course_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Content
    registry.register(Arc::new(ListChaptersTool));
    registry.register(Arc::new(GetChapterTool));
    registry.register(Arc::new(SearchContentTool));

    // Quizzes
    registry.register(Arc::new(GetQuizTool));
    registry.register(Arc::new(SubmitQuizTool));

    // Progress and access
    registry.register(Arc::new(GetProgressTool));
    registry.register(Arc::new(UpdateProgressTool));
    registry.register(Arc::new(GetStreakTool));
    registry.register(Arc::new(CheckAccessTool));

    // Tier-gated
    registry.register(Arc::new(AdaptiveRecommendationsTool));
    registry.register(Arc::new(KnowledgeGapsTool));
    registry.register(Arc::new(GradeOpenAnswerTool));

    registry
}
