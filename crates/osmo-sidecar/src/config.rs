//! CLI / env-var configuration.
//!
//! Every setting is a flag with an env-var override and a documented default;
//! the defaults point at a node on the local host. Loaded once at startup and
//! read-only afterwards.

use std::time::Duration;

use clap::Parser;
use tracing::Level;

use crate::fetch::RetryPolicy;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "osmo-sidecar",
    version,
    about = "Health-check and status sidecar for an Osmosis node"
)]
pub struct Args {
    // ── Upstream endpoints ───────────────────────────────────
    /// Tendermint RPC base URL of the node.
    #[arg(long, env = "RPC_ENDPOINT", default_value = "http://0.0.0.0:26657")]
    pub rpc_endpoint: String,

    /// LCD (REST) base URL of the node.
    #[arg(long, env = "LCD_ENDPOINT", default_value = "http://0.0.0.0:1317")]
    pub lcd_endpoint: String,

    // ── HTTP server ──────────────────────────────────────────
    /// Port for the HTTP server.
    #[arg(long, env = "OSMO_SIDECAR_LISTEN_PORT", default_value_t = 8080)]
    pub listen_port: u16,

    // ── Health policy ────────────────────────────────────────
    /// Minutes after the computed epoch boundary during which block
    /// staleness is tolerated.
    #[arg(long, env = "OSMO_SIDECAR_GRACE_MINUTES", default_value_t = 35)]
    pub grace_minutes: i64,

    /// Status fetch attempts before reporting the node unreachable.
    #[arg(long, env = "OSMO_SIDECAR_FETCH_ATTEMPTS", default_value_t = 48)]
    pub fetch_attempts: u32,

    /// Seconds between status fetch attempts.
    #[arg(long, env = "OSMO_SIDECAR_FETCH_RETRY_DELAY_SECS", default_value_t = 5)]
    pub fetch_retry_delay_secs: u64,

    // ── Logging ──────────────────────────────────────────────
    /// Log level
    #[arg(long, env = "OSMO_SIDECAR_LOG_LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,

    /// Log format (text|json)
    #[arg(long, env = "OSMO_SIDECAR_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}

impl Args {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.fetch_attempts,
            delay: Duration::from_secs(self.fetch_retry_delay_secs),
        }
    }
}
