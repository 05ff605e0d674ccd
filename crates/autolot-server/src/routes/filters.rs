//! Filter option routes
//!
//! Distinct values for the listing page's filter dropdowns.

use axum::{extract::State, routing::get, Json, Router};

use super::{api_error, ApiError};
use crate::AppState;

/// Distinct makes, ascending
#[utoipa::path(
    get,
    path = "/api/filters/makes",
    responses(
        (status = 200, description = "Distinct makes", body = Vec<String>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Filters"
)]
pub async fn list_makes(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let makes = state.vehicles.makes().await.map_err(api_error)?;
    Ok(Json(makes))
}

/// Distinct model years, newest first
#[utoipa::path(
    get,
    path = "/api/filters/years",
    responses(
        (status = 200, description = "Distinct years", body = Vec<i32>),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Filters"
)]
pub async fn list_years(State(state): State<AppState>) -> Result<Json<Vec<i32>>, ApiError> {
    let years = state.vehicles.years().await.map_err(api_error)?;
    Ok(Json(years))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/filters/makes", get(list_makes))
        .route("/api/filters/years", get(list_years))
}
