//! Status fetching with bounded retry.
//!
//! [`StatusFetcher`] wraps a [`StatusClient`] and retries a fixed number of
//! times with a fixed delay. Exhausting the budget yields a typed
//! [`NodeUnreachable`] error rather than killing the process; the HTTP layer
//! maps it to a 503.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use crate::status::NodeStatus;

/// Errors from a single upstream request.
#[derive(Debug)]
pub enum ClientError {
    /// HTTP request failed
    Request(String),
    /// Non-2xx HTTP status
    Http(u16),
    /// Failed to parse response
    Parse(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {}", e),
            Self::Http(status) => write!(f, "HTTP error: {}", status),
            Self::Parse(e) => write!(f, "parse error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

/// Returned when every fetch attempt has failed.
#[derive(Debug)]
pub struct NodeUnreachable {
    pub attempts: u32,
    pub last: ClientError,
}

impl std::fmt::Display for NodeUnreachable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "node unreachable after {} attempts: {}",
            self.attempts, self.last
        )
    }
}

impl std::error::Error for NodeUnreachable {}

/// One attempt at fetching the node's status document.
#[async_trait]
pub trait StatusClient: Send + Sync {
    async fn fetch_status(&self) -> Result<NodeStatus, ClientError>;
}

/// HTTP client for the Tendermint RPC `/status` endpoint.
#[derive(Clone)]
pub struct HttpStatusClient {
    client: Client,
    url: String,
}

impl HttpStatusClient {
    pub fn new(rpc_endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            url: format!("{}/status", rpc_endpoint.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl StatusClient for HttpStatusClient {
    async fn fetch_status(&self) -> Result<NodeStatus, ClientError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Http(response.status().as_u16()));
        }

        response
            .json::<NodeStatus>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Retry budget for status fetches.
///
/// The defaults give 48 attempts 5 seconds apart, roughly four minutes of
/// waiting for a node that is restarting.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 48,
            delay: Duration::from_secs(5),
        }
    }
}

/// Fetches the status document, retrying on both transport and decode
/// failures until the [`RetryPolicy`] is exhausted.
pub struct StatusFetcher {
    client: Arc<dyn StatusClient>,
    policy: RetryPolicy,
}

impl StatusFetcher {
    pub fn new(client: Arc<dyn StatusClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Fetch the node status, sleeping `policy.delay` between failed attempts.
    pub async fn fetch(&self) -> Result<NodeStatus, NodeUnreachable> {
        let mut last: Option<ClientError> = None;

        for attempt in 1..=self.policy.attempts {
            match self.client.fetch_status().await {
                Ok(status) => return Ok(status),
                Err(e) => {
                    debug!(
                        attempt,
                        max_attempts = self.policy.attempts,
                        error = %e,
                        "status fetch failed, retrying"
                    );
                    last = Some(e);
                }
            }
            if attempt < self.policy.attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        let last = last.unwrap_or_else(|| ClientError::Request("no attempts made".to_string()));
        error!(attempts = self.policy.attempts, error = %last, "node unreachable, giving up");
        Err(NodeUnreachable {
            attempts: self.policy.attempts,
            last,
        })
    }
}
