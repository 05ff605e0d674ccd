//! Health check and endpoint index

use axum::{extract::State, routing::get, Json, Router};

use autolot::ConnectionState;

use crate::models::{ApiIndexResponse, HealthResponse};
use crate::AppState;

/// Health check. Reports the store link state without touching the store.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state.vehicles.connection_state().await;
    let status = match database {
        ConnectionState::Error => "degraded",
        _ => "ok",
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Endpoint index
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Available endpoints", body = ApiIndexResponse)
    ),
    tag = "Health"
)]
pub async fn index() -> Json<ApiIndexResponse> {
    let endpoints = [
        "GET /api/health",
        "GET /api/vehicles",
        "POST /api/vehicles",
        "POST /api/vehicles/search",
        "GET /api/vehicles/{id}",
        "PATCH /api/vehicles/{id}",
        "GET /api/filters/makes",
        "GET /api/filters/years",
        "GET /swagger-ui",
    ];

    Json(ApiIndexResponse {
        message: "Autolot vehicle marketplace API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health_check))
}
