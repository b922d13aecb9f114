//! Access API endpoints.

use crate::client::BackendClient;
use crate::error::BackendResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Subscription tier of a learner. Ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[serde(alias = "FREE")]
    Free,
    #[serde(alias = "PREMIUM")]
    Premium,
    #[serde(alias = "PRO")]
    Pro,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Premium => write!(f, "premium"),
            Tier::Pro => write!(f, "pro"),
        }
    }
}

/// Access API for tier lookups.
pub struct AccessApi<'a> {
    client: &'a BackendClient,
}

impl<'a> AccessApi<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Look up a learner's tier, optionally for a specific feature.
    pub async fn check(&self, user_id: &str, feature: Option<&str>) -> BackendResult<AccessCheck> {
        let body = self.check_raw(user_id, feature).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Same lookup, returning the access service's body untouched.
    pub async fn check_raw(&self, user_id: &str, feature: Option<&str>) -> BackendResult<Value> {
        let timeout = self.client.config().timeout;
        let request = AccessCheckRequest {
            user_id: user_id.to_string(),
            feature: feature.map(str::to_string),
        };
        self.client
            .http
            .post(&["access", "check"], &request, timeout)
            .await
    }
}

/// Request body for `POST /access/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCheckRequest {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
}

/// Response from `POST /access/check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCheck {
    pub tier: Tier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_access: Option<bool>,
    /// Remaining fields the access service reports, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
