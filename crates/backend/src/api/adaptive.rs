//! Tier-gated adaptive learning endpoints.
//!
//! The grading endpoint is LLM-backed and runs under the longer deadline.

use crate::client::BackendClient;
use crate::error::BackendResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Adaptive API for recommendations, knowledge-gap analysis and grading.
pub struct AdaptiveApi<'a> {
    client: &'a BackendClient,
}

impl<'a> AdaptiveApi<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Personalised next-step recommendations.
    pub async fn recommendations(&self, user_id: &str) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        let request = LearnerRequest {
            user_id: user_id.to_string(),
            chapter_id: None,
        };
        self.client
            .http
            .post(&["adaptive", "recommendations"], &request, timeout)
            .await
    }

    /// Knowledge-gap analysis, optionally scoped to one chapter.
    pub async fn knowledge_gaps(&self, user_id: &str, chapter_id: Option<&str>) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        let request = LearnerRequest {
            user_id: user_id.to_string(),
            chapter_id: chapter_id.map(str::to_string),
        };
        self.client
            .http
            .post(&["adaptive", "knowledge-gaps"], &request, timeout)
            .await
    }

    /// Grade a free-text answer.
    pub async fn grade_open_answer(&self, request: &GradeAnswerRequest) -> BackendResult<Value> {
        let timeout = self.client.config().llm_timeout;
        self.client
            .http
            .post(&["grading", "open-answer"], request, timeout)
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<String>,
}

/// Request to grade an open answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeAnswerRequest {
    pub user_id: String,
    pub question_id: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::BackendError;

    fn client(server: &MockServer) -> BackendClient {
        BackendClient::builder()
            .base_url(server.uri())
            .timeout(Duration::from_millis(100))
            .llm_timeout(Duration::from_secs(2))
            .build()
            .unwrap()
    }

    async fn mount_slow(server: &MockServer, route: &str) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "ok": true }))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_knowledge_gaps_sends_chapter() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/adaptive/knowledge-gaps"))
            .and(body_json(json!({ "user_id": "U1", "chapter_id": "C2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "gaps": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client(&server)
            .adaptive()
            .knowledge_gaps("U1", Some("C2"))
            .await
            .unwrap();
        assert_eq!(body, json!({ "gaps": [] }));
    }

    #[tokio::test]
    async fn test_grading_uses_llm_timeout() {
        let server = MockServer::start().await;
        mount_slow(&server, "/grading/open-answer").await;

        let request = GradeAnswerRequest {
            user_id: "U1".to_string(),
            question_id: "OQ1".to_string(),
            answer: "LIFO".to_string(),
        };
        let body = client(&server).adaptive().grade_open_answer(&request).await.unwrap();
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_recommendations_use_default_timeout() {
        let server = MockServer::start().await;
        mount_slow(&server, "/adaptive/recommendations").await;

        let result = client(&server).adaptive().recommendations("U1").await;
        assert!(matches!(result, Err(BackendError::Timeout)));
    }
}
