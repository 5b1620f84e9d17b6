//! HTTP intake surface: task submission, stats, and liveness.

pub mod middleware;
pub mod models;
pub mod routes;

use crate::broker::Broker;
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};
use crate::stats::StatsAggregator;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub stats: Arc<StatsAggregator>,
    pub broker: Arc<Broker>,
}

/// Serve the intake API until ctrl-c or SIGTERM.
pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = routes::create_router(state)
        .layer(axum::middleware::from_fn(middleware::request_logger));

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| Error::Config(format!("bad listen address {host}:{port}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("intake API listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Other(format!("server error: {e}")))?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c");
        }
        _ = wait_for_sigterm() => {
            info!("received SIGTERM");
        }
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
    sigterm.recv().await;
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
