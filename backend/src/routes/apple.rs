//! Catalog read routes

use crate::catalog::CultivarRecord;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// Create catalog routes
pub fn apple_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cultivars))
        .route("/:accession", get(get_cultivar))
}

/// All catalog records
///
/// GET /apple
async fn list_cultivars(State(state): State<AppState>) -> ApiResult<Json<Vec<CultivarRecord>>> {
    let records = state.catalog().find_all().await?;
    Ok(Json(records))
}

/// Records with the given accession
///
/// GET /apple/:accession
async fn get_cultivar(
    State(state): State<AppState>,
    Path(accession): Path<String>,
) -> ApiResult<Json<Vec<CultivarRecord>>> {
    let records = state.catalog().find_by_accession(&accession).await?;
    if records.is_empty() {
        return Err(ApiError::NotFound(format!("No cultivar with accession {}", accession)));
    }
    Ok(Json(records))
}
