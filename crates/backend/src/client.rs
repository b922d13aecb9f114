//! Main client for the backend connector.

use crate::api::*;
use crate::config::{ClientConfig, DEFAULT_LLM_TIMEOUT, DEFAULT_TIMEOUT};
use crate::error::{BackendError, BackendResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the collaborator REST services.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl BackendClient {
    /// Create a new client builder.
    pub fn builder() -> BackendClientBuilder {
        BackendClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> BackendResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Chapters and full-text search.
    pub fn content(&self) -> ContentApi<'_> {
        ContentApi::new(self)
    }

    /// Quiz retrieval and submission.
    pub fn quizzes(&self) -> QuizzesApi<'_> {
        QuizzesApi::new(self)
    }

    /// Learner progress and streaks.
    pub fn progress(&self) -> ProgressApi<'_> {
        ProgressApi::new(self)
    }

    /// Subscription tier lookups.
    pub fn access(&self) -> AccessApi<'_> {
        AccessApi::new(self)
    }

    /// Tier-gated recommendation, analysis and grading endpoints.
    pub fn adaptive(&self) -> AdaptiveApi<'_> {
        AdaptiveApi::new(self)
    }
}

/// Builder for creating a BackendClient.
pub struct BackendClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    llm_timeout: Duration,
}

impl BackendClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    /// Set the base URL of the collaborator services.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the deadline for ordinary calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the deadline for LLM-backed calls.
    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> BackendResult<BackendClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| BackendError::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        let config = ClientConfig {
            base_url,
            api_key: self.api_key,
            timeout: self.timeout,
            llm_timeout: self.llm_timeout,
        };

        BackendClient::from_config(config)
    }
}

impl Default for BackendClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = BackendClient::builder().build();
        assert!(matches!(result, Err(BackendError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = BackendClient::builder().base_url("not a url").build();
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));
    }

    #[test]
    fn test_builder_applies_timeouts() {
        let client = BackendClient::builder()
            .base_url("http://localhost:8000")
            .timeout(Duration::from_secs(3))
            .llm_timeout(Duration::from_secs(45))
            .build()
            .unwrap();

        assert_eq!(client.config().timeout, Duration::from_secs(3));
        assert_eq!(client.config().llm_timeout, Duration::from_secs(45));
    }
}
