//! Health and index DTOs

use serde::Serialize;
use utoipa::ToSchema;

use autolot::ConnectionState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the store link is usable, `degraded` otherwise
    pub status: String,
    #[schema(value_type = String, example = "connected")]
    pub database: ConnectionState,
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiIndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
