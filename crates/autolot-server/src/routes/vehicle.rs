//! Vehicle Routes - Listing Management
//!
//! HTTP handlers that delegate to the vehicle catalog for business logic.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use autolot::{ListFilters, RawListFilters};

use super::{api_error, json_body, ApiError};
use crate::models::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleFilterRequest, VehicleListParams,
    VehicleResponse,
};
use crate::AppState;

/// List vehicles, newest first
#[utoipa::path(
    get,
    path = "/api/vehicles",
    params(VehicleListParams),
    responses(
        (status = 200, description = "Matching vehicles", body = Vec<VehicleResponse>),
        (status = 400, description = "Malformed filter value"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<VehicleListParams>,
) -> Result<Json<Vec<VehicleResponse>>, ApiError> {
    let raw = RawListFilters::from(params);
    let filters = ListFilters::parse(&raw)
        .inspect_err(|e| tracing::warn!(operation = "list", ?raw, "Rejected list filters: {}", e))
        .map_err(api_error)?;
    let vehicles = state.vehicles.list(&filters).await.map_err(api_error)?;

    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// List vehicles with a typed filter object
#[utoipa::path(
    post,
    path = "/api/vehicles/search",
    request_body = VehicleFilterRequest,
    responses(
        (status = 200, description = "Matching vehicles", body = Vec<VehicleResponse>),
        (status = 400, description = "Malformed filter object"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Vehicles"
)]
pub async fn search_vehicles(
    State(state): State<AppState>,
    payload: Result<Json<VehicleFilterRequest>, JsonRejection>,
) -> Result<Json<Vec<VehicleResponse>>, ApiError> {
    let filters = ListFilters::from(json_body("search", payload)?);
    let vehicles = state.vehicles.list(&filters).await.map_err(api_error)?;

    Ok(Json(vehicles.into_iter().map(VehicleResponse::from).collect()))
}

/// Create a listing
#[utoipa::path(
    post,
    path = "/api/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = VehicleResponse),
        (status = 400, description = "Invalid vehicle"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VehicleResponse>), ApiError> {
    let payload = json_body("create", payload)?;
    let vehicle = state
        .vehicles
        .create(payload.into())
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(vehicle.into())))
}

/// Get a listing by ID
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    params(
        ("id" = String, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 200, description = "Vehicle found", body = VehicleResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Vehicle not found")
    ),
    tag = "Vehicles"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VehicleResponse>, ApiError> {
    let vehicle = state.vehicles.get(&id).await.map_err(api_error)?;
    Ok(Json(vehicle.into()))
}

/// Partially update a listing, e.g. to mark it sold
#[utoipa::path(
    patch,
    path = "/api/vehicles/{id}",
    params(
        ("id" = String, Path, description = "Vehicle ID")
    ),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated", body = VehicleResponse),
        (status = 400, description = "Invalid patch"),
        (status = 404, description = "Vehicle not found")
    ),
    tag = "Vehicles"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateVehicleRequest>, JsonRejection>,
) -> Result<Json<VehicleResponse>, ApiError> {
    let payload = json_body("update", payload)?;
    let vehicle = state
        .vehicles
        .update(&id, payload.into())
        .await
        .map_err(api_error)?;

    Ok(Json(vehicle.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/vehicles", get(list_vehicles).post(create_vehicle))
        .route("/api/vehicles/search", post(search_vehicles))
        .route("/api/vehicles/:id", get(get_vehicle).patch(update_vehicle))
}
