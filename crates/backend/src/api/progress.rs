//! Progress and streak API endpoints.

use crate::client::BackendClient;
use crate::error::BackendResult;
use serde_json::Value;

/// Progress API for learner progress and streaks.
pub struct ProgressApi<'a> {
    client: &'a BackendClient,
}

impl<'a> ProgressApi<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Get a learner's progress across chapters.
    pub async fn get(&self, user_id: &str) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client.http.get(&["progress", user_id], timeout).await
    }

    /// Record progress for a learner.
    pub async fn update(&self, user_id: &str, update: &Value) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client
            .http
            .put(&["progress", user_id], update, timeout)
            .await
    }

    /// Get a learner's current streak.
    pub async fn streak(&self, user_id: &str) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client.http.get(&["streaks", user_id], timeout).await
    }
}
