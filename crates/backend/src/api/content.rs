//! Content API endpoints.

use crate::client::BackendClient;
use crate::error::BackendResult;
use serde_json::Value;

/// Content API for chapters and search.
pub struct ContentApi<'a> {
    client: &'a BackendClient,
}

impl<'a> ContentApi<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// List all chapters.
    pub async fn list_chapters(&self) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client.http.get(&["chapters"], timeout).await
    }

    /// Get one chapter with its content.
    pub async fn get_chapter(&self, chapter_id: &str) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client.http.get(&["chapters", chapter_id], timeout).await
    }

    /// Full-text search across course content.
    pub async fn search(&self, query: &str) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        self.client
            .http
            .get_with_query(&["search"], &[("q", query)], timeout)
            .await
    }
}
