//! osmo-sidecar — binary entry point.
//!
//! Parses CLI / env-var configuration, wires the status fetcher and epoch
//! tracker into the HTTP server, and serves until a shutdown signal.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::Level;

use osmo_sidecar::api::{create_router, AppState};
use osmo_sidecar::config::Args;
use osmo_sidecar::epoch::{EpochTracker, HttpEpochClient};
use osmo_sidecar::fetch::{HttpStatusClient, StatusFetcher};
use osmo_sidecar::metrics::HealthMetrics;

fn init_logging(log_format: &str, log_level: Level) {
    if log_format.to_lowercase() == "json" {
        let _ = tracing_subscriber::fmt()
            .json()
            .with_max_level(log_level)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .try_init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_format, args.log_level);

    tracing::info!(
        rpc = %args.rpc_endpoint,
        lcd = %args.lcd_endpoint,
        listen_port = args.listen_port,
        grace_minutes = args.grace_minutes,
        "starting osmo-sidecar"
    );

    let metrics = HealthMetrics::from_env("osmo_sidecar.health");
    let fetcher = Arc::new(StatusFetcher::new(
        Arc::new(HttpStatusClient::new(&args.rpc_endpoint)),
        args.retry_policy(),
    ));
    let epochs = Arc::new(EpochTracker::new(
        Arc::new(HttpEpochClient::new(&args.lcd_endpoint)),
        args.grace_minutes,
    ));

    let state = AppState {
        fetcher,
        epochs,
        metrics,
    };
    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], args.listen_port));

    tracing::info!(address = %addr, "starting HTTP server");
    let listener = TcpListener::bind(addr).await?;

    // Setup graceful shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    tracing::info!("osmo-sidecar shutdown complete");
    Ok(())
}
