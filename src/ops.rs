//! Ops surface
//!
//! Health and Prometheus endpoints on their own listener, kept apart
//! from the chat transport so scrapes never contend with gameplay.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::routing::get;
use axum::Router;
use serde::Serialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::metrics::CasinoMetrics;
use crate::Casino;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct OpsState {
    pub casino: Arc<Casino>,
    pub metrics: Arc<CasinoMetrics>,
    pub started_at: Instant,
}

impl OpsState {
    pub fn new(casino: Arc<Casino>, metrics: Arc<CasinoMetrics>) -> Self {
        Self {
            casino,
            metrics,
            started_at: Instant::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: u64,
    pub uptime_seconds: u64,
    pub accounts: u64,
    pub chips_in_play: u64,
}

/// Axum handler for the health check endpoint
pub async fn health_handler(
    axum::extract::State(state): axum::extract::State<OpsState>,
) -> axum::Json<HealthStatus> {
    let stats = state.casino.ledger().stats();
    axum::Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: current_timestamp(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        accounts: stats.accounts,
        chips_in_play: stats.total_balance,
    })
}

/// Axum handler for the Prometheus metrics endpoint
pub async fn metrics_handler(
    axum::extract::State(state): axum::extract::State<OpsState>,
) -> axum::response::Response<String> {
    let stats = state.casino.ledger().stats();
    let body = state.metrics.to_prometheus_format(&stats);

    axum::response::Response::builder()
        .header("Content-Type", "text/plain; version=0.0.4; charset=utf-8")
        .body(body)
        .unwrap()
}

pub fn router(state: OpsState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the ops endpoints until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: OpsState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("📊 Ops endpoints at http://{addr}/health and http://{addr}/metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("🛑 Ops server stopped");
    Ok(())
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
