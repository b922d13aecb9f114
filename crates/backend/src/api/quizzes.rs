//! Quizzes API endpoints.

use crate::client::BackendClient;
use crate::error::BackendResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Quizzes API for fetching and submitting quizzes.
pub struct QuizzesApi<'a> {
    client: &'a BackendClient,
}

impl<'a> QuizzesApi<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Get a quiz with its questions.
    pub async fn get(&self, quiz_id: &str) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client.http.get(&["quizzes", quiz_id], timeout).await
    }

    /// Submit answers for scoring.
    pub async fn submit(&self, quiz_id: &str, request: &SubmitQuizRequest) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client
            .http
            .post(&["quizzes", quiz_id, "submit"], request, timeout)
            .await
    }
}

/// Request to submit quiz answers.
///
/// `answers` is forwarded exactly as received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizRequest {
    pub user_id: String,
    pub answers: Value,
}
