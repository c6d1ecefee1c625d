//! Health check endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (database and catalog store)
//! - /health/live - Liveness probe

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub catalog: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn healthy(message: Option<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            message,
        }
    }

    fn unhealthy(message: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            message: Some(message),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn response(status: &str, checks: Option<HealthChecks>) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    }
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(response("healthy", None))
}

/// Readiness probe
///
/// Returns 503 if the database or the catalog store cannot be reached. An
/// empty catalog is still ready; the record count is reported.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = match db::health_check(state.db()).await {
        Ok(_) => CheckStatus::healthy(None),
        Err(e) => CheckStatus::unhealthy(e.to_string()),
    };

    let catalog = match state.catalog().count().await {
        Ok(count) => CheckStatus::healthy(Some(format!("{} records", count))),
        Err(e) => CheckStatus::unhealthy(e.to_string()),
    };

    let is_healthy = database.is_healthy() && catalog.is_healthy();
    let body = response(
        if is_healthy { "ready" } else { "not_ready" },
        Some(HealthChecks { database, catalog }),
    );

    if is_healthy {
        Ok(Json(body))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(body)))
    }
}

/// Liveness probe - always OK while the server is running
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(response("alive", None))
}
