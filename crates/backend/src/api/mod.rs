//! Collaborator API endpoints, one module per service.

pub mod access;
pub mod adaptive;
pub mod content;
pub mod progress;
pub mod quizzes;

pub use access::AccessApi;
pub use adaptive::AdaptiveApi;
pub use content::ContentApi;
pub use progress::ProgressApi;
pub use quizzes::QuizzesApi;
