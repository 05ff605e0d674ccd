use axum::Router;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod models;
mod routes;

use adapters::{PgConnector, PgVehicleRepository};
use application::{VehicleCatalog, VehicleService};
use autolot::{ConnectionManager, ConnectionSettings};

/// Pool size override
const MAX_CONNECTIONS_KEY: &str = "AUTOLOT_MAX_CONNECTIONS";

/// Application service with the concrete Postgres adapters
pub type AppVehicleService = VehicleService<PgConnector, PgVehicleRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub vehicles: Arc<dyn VehicleCatalog>,
}

/// Assemble every route, the OpenAPI document and middleware
pub fn build_router(state: AppState) -> Router {
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(routes::health::router())
        .merge(routes::vehicle::router())
        .merge(routes::filters::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🚗 Autolot API initializing...");

    // Local .env is a fallback for anything not in Secrets.toml
    dotenvy::dotenv().ok();

    let settings = ConnectionSettings::from_lookup(|key| {
        secrets.get(key).or_else(|| std::env::var(key).ok())
    });

    if settings.database_url().is_some() {
        tracing::info!(
            "🔌 Store configured (connect timeout {:?}, ping timeout {:?}); connecting on first request",
            settings.connect_timeout,
            settings.ping_timeout
        );
    } else {
        tracing::warn!("⚠️  No DATABASE_URL set - vehicle endpoints will fail until configured");
    }

    let mut connector = PgConnector::new();
    if let Some(max) = secrets
        .get(MAX_CONNECTIONS_KEY)
        .or_else(|| std::env::var(MAX_CONNECTIONS_KEY).ok())
        .and_then(|s| s.parse().ok())
    {
        connector = connector.with_max_connections(max);
    }

    let connection = Arc::new(ConnectionManager::new(connector, settings));
    let repo = Arc::new(PgVehicleRepository::new());
    let service: AppVehicleService = VehicleService::new(connection, repo);

    let state = AppState {
        vehicles: Arc::new(service),
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Autolot API ready");

    Ok(router.into())
}
