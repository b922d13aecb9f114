//! Server-Sent-Events notification channel.
//!
//! Each connection announces the server, then the tool and resource lists,
//! then idles emitting comment-only keep-alives until the client goes away
//! (the stream is dropped) or the shutdown token fires.

use crate::protocol::{
    InitializeResult, JsonRpcRequest, ListResourcesResult, ListToolsResult, ServerInfo,
};
use futures::Stream;
use serde_json::json;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Comment line that keeps intermediaries from timing out an idle stream.
pub const KEEP_ALIVE_FRAME: &str = ": keep-alive\n\n";

/// Frame a JSON-RPC message as one SSE `message` event.
pub fn sse_frame(message: &JsonRpcRequest) -> String {
    let data = serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string());
    format!("event: message\ndata: {}\n\n", data)
}

/// Lifecycle of one SSE connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Announcing,
    Idle,
    Closed,
}

/// Builds per-connection announcement streams. The announcement frames are
/// rendered once and shared by every connection.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    announcements: Vec<String>,
    keep_alive: Duration,
}

impl NotificationChannel {
    pub fn new(
        server_info: ServerInfo,
        tools: ListToolsResult,
        resources: ListResourcesResult,
        keep_alive: Duration,
    ) -> Self {
        let init = InitializeResult::new(server_info);
        let announcements = vec![
            JsonRpcRequest::notification(
                "notifications/initialized",
                json!({
                    "protocolVersion": init.protocol_version,
                    "serverInfo": init.server_info,
                    "capabilities": init.capabilities,
                }),
            ),
            JsonRpcRequest::notification("tools/list", json!(tools)),
            JsonRpcRequest::notification("resources/list", json!(resources)),
        ]
        .iter()
        .map(sse_frame)
        .collect();

        Self {
            announcements,
            keep_alive,
        }
    }

    /// Open a stream for one connection. `connection_id` only tags log lines.
    pub fn open(
        &self,
        connection_id: String,
        shutdown: CancellationToken,
    ) -> impl Stream<Item = String> + Send + 'static {
        let announcements = self.announcements.clone();
        let period = self.keep_alive;

        async_stream::stream! {
            let mut guard = ConnectionGuard::new(connection_id);

            guard.transition(ConnectionState::Announcing);
            for frame in announcements {
                yield frame;
            }

            guard.transition(ConnectionState::Idle);
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                let tick = tokio::select! {
                    _ = shutdown.cancelled() => false,
                    _ = ticker.tick() => true,
                };
                if !tick {
                    break;
                }
                yield KEEP_ALIVE_FRAME.to_string();
            }
        }
    }
}

/// Tracks a connection's state and logs the close however the stream ends,
/// including when the client disconnects and the stream is simply dropped.
struct ConnectionGuard {
    id: String,
    state: ConnectionState,
}

impl ConnectionGuard {
    fn new(id: String) -> Self {
        info!(connection = %id, "SSE connection opened");
        Self {
            id,
            state: ConnectionState::Connected,
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        debug!(connection = %self.id, from = ?self.state, to = ?next, "SSE state change");
        self.state = next;
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let last = self.state;
        self.state = ConnectionState::Closed;
        info!(connection = %self.id, last_state = ?last, "SSE connection closed");
    }
}
