//! Vehicle Repository Port
//!
//! Abstract interface for Vehicle persistence operations.
//! Every method is a single store round-trip on a handle obtained from the
//! connection manager.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, ListQuery, NewVehicle, VehiclePatch, VehicleRecord};

/// Repository interface for Vehicle entities
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    type Handle: Send + Sync;

    /// Find every vehicle matching `query`, in the query's order
    async fn find(
        &self,
        handle: &Self::Handle,
        query: &ListQuery,
    ) -> Result<Vec<VehicleRecord>, DomainError>;

    /// Find a vehicle by its store key
    async fn find_by_id(
        &self,
        handle: &Self::Handle,
        id: Uuid,
    ) -> Result<Option<VehicleRecord>, DomainError>;

    /// Insert a validated vehicle; the store assigns the key and timestamps
    async fn insert(
        &self,
        handle: &Self::Handle,
        vehicle: &NewVehicle,
    ) -> Result<VehicleRecord, DomainError>;

    /// Apply a validated patch; `None` when no vehicle has `id`
    async fn update(
        &self,
        handle: &Self::Handle,
        id: Uuid,
        patch: &VehiclePatch,
    ) -> Result<Option<VehicleRecord>, DomainError>;

    /// Distinct make values as stored, in no particular order
    async fn distinct_makes(&self, handle: &Self::Handle) -> Result<Vec<String>, DomainError>;

    /// Distinct model years as stored, in no particular order
    async fn distinct_years(&self, handle: &Self::Handle) -> Result<Vec<i32>, DomainError>;
}
