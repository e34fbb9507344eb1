//! Liveness and readiness checks.
//!
//! Mounted outside the API prefix and served without a token. Readiness is a
//! `SELECT 1` on the procedure pool through the procedure executor.

use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use jiff::Timestamp;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    fn status_code(self) -> StatusCode {
        match self {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub timestamp: Timestamp,
    pub database: DatabaseCheck,
}

/// Outcome of the database round trip
#[derive(Debug, Serialize)]
pub struct DatabaseCheck {
    pub status: HealthStatus,
    #[serde(rename = "latencyMs")]
    pub latency_ms: u64,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/health/live", get(live))
}

/// `200` with a report while the database answers, `503` otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = check_database(&state).await;
    let report = HealthReport {
        status: database.status,
        version: crate::pkg_version(),
        timestamp: Timestamp::now(),
        database,
    };
    (report.status.status_code(), Json(report))
}

async fn ready(State(state): State<AppState>) -> StatusCode {
    check_database(&state).await.status.status_code()
}

/// Never touches the database, so a slow pool cannot get the process killed.
async fn live() -> StatusCode {
    StatusCode::OK
}

async fn check_database(state: &AppState) -> DatabaseCheck {
    let started = Instant::now();
    let status = match state.executor.ping().await {
        Ok(()) => HealthStatus::Healthy,
        Err(e) => {
            tracing::warn!(error = ?e, "database check failed");
            HealthStatus::Unhealthy
        }
    };
    DatabaseCheck {
        status,
        latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    }
}
