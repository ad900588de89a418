//! StatsD metrics for health outcomes.
//!
//! Emission is fire-and-forget; a metrics failure never affects a request.

use std::net::UdpSocket;
use std::sync::Arc;

use cadence::{CountedExt, Gauged, StatsdClient, UdpMetricSink};

use crate::health::{HealthReport, HealthVerdict};

/// Metrics client wrapper for the health endpoints.
#[derive(Clone, Debug)]
pub struct HealthMetrics {
    client: Arc<StatsdClient>,
}

impl HealthMetrics {
    pub fn new(client: StatsdClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Build a client against the local StatsD agent, honoring
    /// `DD_AGENT_HOST` when set.
    pub fn from_env(prefix: &str) -> Self {
        let host = std::env::var("DD_AGENT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let addr = format!("{}:8125", host);

        let socket = UdpSocket::bind("0.0.0.0:0").expect("failed to bind UDP socket");
        socket
            .set_nonblocking(true)
            .expect("failed to set socket nonblocking");
        let sink = UdpMetricSink::from(addr.as_str(), socket).expect("failed to create StatsD sink");

        Self::new(StatsdClient::from_sink(prefix, sink))
    }

    /// Record the outcome of one health evaluation.
    pub fn record_verdict(&self, report: &HealthReport) {
        match report.verdict {
            HealthVerdict::Up => {
                let _ = self.client.incr("up");
            }
            HealthVerdict::Down => {
                let _ = self.client.incr("down");
            }
        }
        let _ = self.client.gauge(
            "seconds_since_last_block",
            report.seconds_since_last_block.max(0) as u64,
        );
    }

    /// Count a status fetch that exhausted its retry budget.
    pub fn increment_fetch_error(&self) {
        let _ = self.client.incr("fetch_error");
    }
}
