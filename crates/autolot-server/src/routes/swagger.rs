//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    ApiIndexResponse, CreateVehicleRequest, HealthResponse, UpdateVehicleRequest,
    VehicleFilterRequest, VehicleResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        super::health::index,
        super::health::health_check,
        // Vehicle endpoints
        super::vehicle::list_vehicles,
        super::vehicle::search_vehicles,
        super::vehicle::create_vehicle,
        super::vehicle::get_vehicle,
        super::vehicle::update_vehicle,
        // Filter endpoints
        super::filters::list_makes,
        super::filters::list_years,
    ),
    info(
        title = "Autolot API",
        version = "0.1.0",
        description = "Vehicle marketplace API: listings, filtering and filter options.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Vehicles", description = "Vehicle listing management"),
        (name = "Filters", description = "Distinct values for filter dropdowns"),
    ),
    components(
        schemas(
            HealthResponse,
            ApiIndexResponse,
            VehicleResponse,
            CreateVehicleRequest,
            UpdateVehicleRequest,
            VehicleFilterRequest,
        )
    ),
)]
pub struct ApiDoc;
