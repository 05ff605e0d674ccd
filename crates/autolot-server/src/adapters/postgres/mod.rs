//! PostgreSQL Implementations

mod connector;
mod vehicle_repository;

pub use connector::PgConnector;
pub use vehicle_repository::PgVehicleRepository;
