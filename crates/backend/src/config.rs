//! Configuration types for the backend connector.

use std::time::Duration;
use url::Url;

/// Default deadline for ordinary backend calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for LLM-backed calls (open-answer grading).
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the collaborator REST services.
    pub base_url: Url,
    /// Bearer token sent on every request.
    pub api_key: Option<String>,
    /// Deadline for ordinary calls.
    pub timeout: Duration,
    /// Deadline for LLM-backed calls.
    pub llm_timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}
