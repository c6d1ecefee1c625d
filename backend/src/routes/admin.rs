//! Admin routes
//!
//! Login plus the bearer-protected endpoints.

use crate::auth::AdminAuth;
use crate::error::{ApiError, ApiResult};
use crate::services::{AdminService, IngestionOutcome};
use crate::state::AppState;
use apple_catalog_shared::{AdminProfile, AuthToken, LoginRequest, RefreshSummary};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/catalog/refresh", post(refresh_catalog))
}

/// Login with email and password
///
/// POST /admin/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthToken>> {
    let token = AdminService::login(state.db(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(token))
}

/// The admin the presented token belongs to
///
/// GET /admin/me
async fn me(admin: AdminAuth) -> Json<AdminProfile> {
    Json(AdminProfile {
        email: admin.email,
        expires_at: admin.expires_at,
    })
}

/// Re-run catalog ingestion
///
/// POST /admin/catalog/refresh
///
/// Returns 409 while another run is in progress.
async fn refresh_catalog(
    State(state): State<AppState>,
    admin: AdminAuth,
) -> ApiResult<Json<RefreshSummary>> {
    info!(admin = %admin.email, "Catalog refresh requested");

    let outcome = state.ingestion().run().await;
    if outcome == IngestionOutcome::AlreadyRunning {
        return Err(ApiError::Conflict(
            "Catalog ingestion already in progress".to_string(),
        ));
    }

    Ok(Json(RefreshSummary {
        status: outcome.status().to_string(),
        loaded: outcome.loaded(),
    }))
}
