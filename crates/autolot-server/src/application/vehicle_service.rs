//! Vehicle Application Service (Use Case)
//!
//! Every operation runs the same pipeline: validate input, make sure the
//! store link is up, translate to a store query, run it, then normalize the
//! rows into the public shape. Nothing touches the store before validation
//! has passed.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use autolot::{
    build_list_query, distinct_makes, distinct_years, normalize, ConnectionManager,
    ConnectionState, DomainError, ListFilters, NewVehicle, StoreConnector, Vehicle, VehiclePatch,
    VehicleRepository,
};

/// Operations the HTTP layer needs, independent of the concrete store
#[async_trait]
pub trait VehicleCatalog: Send + Sync {
    /// Vehicles matching `filters`, newest first
    async fn list(&self, filters: &ListFilters) -> Result<Vec<Vehicle>, DomainError>;

    async fn get(&self, id: &str) -> Result<Vehicle, DomainError>;

    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, DomainError>;

    async fn update(&self, id: &str, patch: VehiclePatch) -> Result<Vehicle, DomainError>;

    /// Distinct makes, ascending
    async fn makes(&self) -> Result<Vec<String>, DomainError>;

    /// Distinct model years, descending
    async fn years(&self) -> Result<Vec<i32>, DomainError>;

    async fn connection_state(&self) -> ConnectionState;
}

/// Application service for vehicle operations
pub struct VehicleService<C, R>
where
    C: StoreConnector,
    R: VehicleRepository<Handle = C::Handle>,
{
    connection: Arc<ConnectionManager<C>>,
    repo: Arc<R>,
}

impl<C, R> VehicleService<C, R>
where
    C: StoreConnector,
    R: VehicleRepository<Handle = C::Handle>,
{
    pub fn new(connection: Arc<ConnectionManager<C>>, repo: Arc<R>) -> Self {
        Self { connection, repo }
    }

    async fn handle(&self, operation: &str) -> Result<C::Handle, DomainError> {
        self.connection.ensure_ready().await.map_err(|e| {
            tracing::error!(operation, kind = e.kind(), "Store unavailable: {}", e);
            DomainError::from(e)
        })
    }
}

fn parse_id(operation: &str, id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id.trim()).map_err(|_| {
        let err = DomainError::validation(format!("Invalid vehicle id: {:?}", id));
        tracing::warn!(operation, id, "Rejected request: {}", err);
        err
    })
}

fn missing(operation: &str, record_id: Uuid) -> DomainError {
    tracing::info!(operation, %record_id, "Vehicle not found");
    DomainError::not_found("Vehicle", record_id)
}

#[async_trait]
impl<C, R> VehicleCatalog for VehicleService<C, R>
where
    C: StoreConnector,
    R: VehicleRepository<Handle = C::Handle> + 'static,
{
    async fn list(&self, filters: &ListFilters) -> Result<Vec<Vehicle>, DomainError> {
        let handle = self.handle("list").await?;
        let query = build_list_query(filters);

        let records = self
            .repo
            .find(&handle, &query)
            .await
            .inspect_err(|e| tracing::error!(operation = "list", ?filters, "Failed to list vehicles: {}", e))?;

        tracing::debug!("Listed {} vehicles", records.len());
        Ok(records.into_iter().map(normalize).collect())
    }

    async fn get(&self, id: &str) -> Result<Vehicle, DomainError> {
        let record_id = parse_id("get", id)?;
        let handle = self.handle("get").await?;

        self.repo
            .find_by_id(&handle, record_id)
            .await
            .inspect_err(|e| tracing::error!(operation = "get", %record_id, "Failed to load vehicle: {}", e))?
            .map(normalize)
            .ok_or_else(|| missing("get", record_id))
    }

    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, DomainError> {
        let title = vehicle.title.clone();
        let vehicle = vehicle
            .validate()
            .inspect_err(|e| tracing::warn!(operation = "create", %title, "Rejected vehicle: {}", e))?;
        let handle = self.handle("create").await?;

        let record = self
            .repo
            .insert(&handle, &vehicle)
            .await
            .inspect_err(|e| tracing::error!(operation = "create", %title, "Failed to create vehicle: {}", e))?;

        tracing::info!("Created vehicle: {} ({})", record.title, record.record_id);
        Ok(normalize(record))
    }

    async fn update(&self, id: &str, patch: VehiclePatch) -> Result<Vehicle, DomainError> {
        let record_id = parse_id("update", id)?;
        let patch = patch
            .validate()
            .inspect_err(|e| tracing::warn!(operation = "update", %record_id, "Rejected patch: {}", e))?;
        let handle = self.handle("update").await?;

        let record = self
            .repo
            .update(&handle, record_id, &patch)
            .await
            .inspect_err(|e| tracing::error!(operation = "update", %record_id, "Failed to update vehicle: {}", e))?
            .ok_or_else(|| missing("update", record_id))?;

        tracing::info!("Updated vehicle: {} ({})", record.title, record.record_id);
        Ok(normalize(record))
    }

    async fn makes(&self) -> Result<Vec<String>, DomainError> {
        let handle = self.handle("makes").await?;
        let makes = self
            .repo
            .distinct_makes(&handle)
            .await
            .inspect_err(|e| tracing::error!(operation = "makes", "Failed to load makes: {}", e))?;
        Ok(distinct_makes(makes))
    }

    async fn years(&self) -> Result<Vec<i32>, DomainError> {
        let handle = self.handle("years").await?;
        let years = self
            .repo
            .distinct_years(&handle)
            .await
            .inspect_err(|e| tracing::error!(operation = "years", "Failed to load years: {}", e))?;
        Ok(distinct_years(years))
    }

    async fn connection_state(&self) -> ConnectionState {
        self.connection.state().await
    }
}
