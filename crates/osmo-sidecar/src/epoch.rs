//! Epoch window tracking.
//!
//! Osmosis performs extra processing after each daily epoch boundary, during
//! which block production is expected to stall. [`EpochTracker`] caches the
//! computed start of the next processing window and answers whether a given
//! instant falls inside it, refetching the epoch list only when the cached
//! window has been passed.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::fetch::ClientError;

/// Identifier of the epoch whose boundary drives node catch-up.
pub const DAY_EPOCH_IDENTIFIER: &str = "day";

/// The processing window is assumed to open 5 minutes before the naively
/// computed next boundary (start + 24h).
const WINDOW_LEAD: i64 = 5;

/// Epoch list as served by `/osmosis/epochs/v1beta1/epochs`.
#[derive(Debug, Clone, Deserialize)]
pub struct EpochsResponse {
    pub epochs: Vec<EpochRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpochRecord {
    pub identifier: String,
    pub current_epoch_start_time: DateTime<Utc>,
}

#[derive(Debug)]
pub enum EpochError {
    /// Upstream request or decode failure
    Client(ClientError),
    /// The epoch list has no `"day"` record
    DayEpochMissing,
}

impl std::fmt::Display for EpochError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client(e) => write!(f, "epoch fetch failed: {}", e),
            Self::DayEpochMissing => write!(f, "no \"day\" epoch in epoch list"),
        }
    }
}

impl std::error::Error for EpochError {}

/// One attempt at fetching the chain's epoch list.
#[async_trait]
pub trait EpochClient: Send + Sync {
    async fn fetch_epochs(&self) -> Result<EpochsResponse, ClientError>;
}

/// HTTP client for the LCD epochs endpoint.
#[derive(Clone)]
pub struct HttpEpochClient {
    client: Client,
    url: String,
}

impl HttpEpochClient {
    pub fn new(lcd_endpoint: &str) -> Self {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(5))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            url: format!(
                "{}/osmosis/epochs/v1beta1/epochs",
                lcd_endpoint.trim_end_matches('/')
            ),
        }
    }
}

#[async_trait]
impl EpochClient for HttpEpochClient {
    async fn fetch_epochs(&self) -> Result<EpochsResponse, ClientError> {
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
            .json::<EpochsResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Compute the expected start of the next day-epoch processing window:
/// current day-epoch start + 24h, less the 5-minute lead.
pub fn next_window_start(epochs: &EpochsResponse) -> Result<DateTime<Utc>, EpochError> {
    let day = epochs
        .epochs
        .iter()
        .find(|e| e.identifier == DAY_EPOCH_IDENTIFIER)
        .ok_or(EpochError::DayEpochMissing)?;

    Ok(day.current_epoch_start_time + Duration::hours(24) - Duration::minutes(WINDOW_LEAD))
}

/// Tracks the next epoch-processing window behind a single cached value.
///
/// The cache holds the computed window start, or `None` after a failed
/// recompute. The whole check-recompute-evaluate sequence runs under one
/// mutex, so concurrent health checks see either the previous or the new
/// window in full.
pub struct EpochTracker {
    client: Arc<dyn EpochClient>,
    /// Tolerance after the window start during which staleness is benign.
    grace: Duration,
    window_start: Mutex<Option<DateTime<Utc>>>,
}

impl EpochTracker {
    pub fn new(client: Arc<dyn EpochClient>, grace_minutes: i64) -> Self {
        Self {
            client,
            grace: Duration::minutes(grace_minutes),
            window_start: Mutex::new(None),
        }
    }

    /// Whether `now` falls inside `(window_start, window_start + grace)`.
    ///
    /// Recomputes the cached window when it is missing or already passed.
    /// A failed recompute leaves the cache empty, which reads as "not in
    /// epoch" and forces another recompute on the next call.
    pub async fn is_within_epoch_window(&self, now: DateTime<Utc>) -> bool {
        let mut window = self.window_start.lock().await;

        let stale = match *window {
            None => true,
            Some(start) => now > start + self.grace,
        };
        if stale {
            *window = match self.recompute().await {
                Ok(start) => Some(start),
                Err(e) => {
                    warn!(error = %e, "epoch window recompute failed, treating as not in epoch");
                    None
                }
            };
        }

        match *window {
            Some(start) => start < now && now < start + self.grace,
            None => false,
        }
    }

    async fn recompute(&self) -> Result<DateTime<Utc>, EpochError> {
        let epochs = self.client.fetch_epochs().await.map_err(EpochError::Client)?;
        let start = next_window_start(&epochs)?;
        debug!(window_start = %start, "recomputed epoch window");
        Ok(start)
    }
}
