//! Axum HTTP server for the status and health endpoints.
//!
//! Read-only endpoints, all GET, no authentication:
//! - `/node_id` - node id as plain text
//! - `/pub_key` - validator public key as a Cosmos `Any`-style JSON object
//! - `/block` - latest block as JSON
//! - `/height` - latest block height as plain text
//! - `/health` - UP/DOWN verdict, 200 or 503
//!
//! Every handler starts from a fresh status fetch; an exhausted retry budget
//! maps to a 503 rather than terminating the process.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};

use crate::epoch::EpochTracker;
use crate::fetch::StatusFetcher;
use crate::health::evaluate;
use crate::metrics::HealthMetrics;
use crate::status::NodeStatus;

const ED25519_PUB_KEY_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<StatusFetcher>,
    pub epochs: Arc<EpochTracker>,
    pub metrics: HealthMetrics,
}

/// Create the axum router with all five endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/node_id", get(node_id_handler))
        .route("/pub_key", get(pub_key_handler))
        .route("/block", get(block_handler))
        .route("/height", get(height_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct PubKeyBody {
    #[serde(rename = "@type")]
    type_url: &'static str,
    key: String,
}

/// Fetch the status document, or produce the 503 the caller should return.
async fn fetch_or_unavailable(state: &AppState) -> Result<NodeStatus, Response> {
    match state.fetcher.fetch().await {
        Ok(status) => Ok(status),
        Err(e) => {
            error!(error = %e, "status fetch failed");
            state.metrics.increment_fetch_error();
            Err((StatusCode::SERVICE_UNAVAILABLE, "node unreachable\n").into_response())
        }
    }
}

async fn node_id_handler(State(state): State<AppState>) -> Response {
    match fetch_or_unavailable(&state).await {
        Ok(status) => status.result.node_info.id.into_response(),
        Err(resp) => resp,
    }
}

async fn pub_key_handler(State(state): State<AppState>) -> Response {
    match fetch_or_unavailable(&state).await {
        Ok(status) => Json(PubKeyBody {
            type_url: ED25519_PUB_KEY_TYPE_URL,
            key: status.result.validator_info.pub_key.value,
        })
        .into_response(),
        Err(resp) => resp,
    }
}

async fn block_handler(State(state): State<AppState>) -> Response {
    match fetch_or_unavailable(&state).await {
        Ok(status) => Json(status.latest_block()).into_response(),
        Err(resp) => resp,
    }
}

async fn height_handler(State(state): State<AppState>) -> Response {
    match fetch_or_unavailable(&state).await {
        Ok(status) => status.result.sync_info.latest_block_height.into_response(),
        Err(resp) => resp,
    }
}

async fn health_handler(State(state): State<AppState>) -> Response {
    let status = match fetch_or_unavailable(&state).await {
        Ok(status) => status,
        Err(resp) => return resp,
    };

    let now = Utc::now();
    let is_epoch = state.epochs.is_within_epoch_window(now).await;
    let report = evaluate(&status, is_epoch, now);

    state.metrics.record_verdict(&report);
    debug!(
        catching_up = status.result.sync_info.catching_up,
        seconds_since_last_block = report.seconds_since_last_block,
        is_epoch,
        verdict = report.verdict.as_str(),
        "healthcheck evaluated"
    );

    let code = if report.verdict.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = format!(
        "{}\nLatest Block {} (Received {} seconds ago)\n",
        report.verdict.as_str(),
        report.height,
        report.seconds_since_last_block
    );

    (code, body).into_response()
}
