//! Application Layer (Use Cases)
//!
//! Orchestrates the connection manager, query translation and the
//! vehicle repository.

mod vehicle_service;

pub use vehicle_service::{VehicleCatalog, VehicleService};
