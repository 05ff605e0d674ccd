//! Autolot Domain Library
//!
//! Core domain types and interfaces for the Autolot vehicle marketplace.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Vehicle creation payloads, patches, store rows and the public shape
//!   - `value_objects/`: Closed enums (FuelType, Transmission)
//!   - `services/`: Query translation (filters -> store query, rows -> public shape)
//!   - `errors/`: Domain and connection error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `connector`: Establishing and probing a store link
//!   - `repositories/`: Data access interfaces
//!
//! - **Connection** (`connection/`): Lazy, shared store link with a
//!   Disconnected / Connecting / Connected / Error lifecycle
//!
//! - **Memory** (`memory`): In-process store adapter for tests and local runs
//!
//! # Usage
//!
//! ```rust,ignore
//! use autolot::{build_list_query, ConnectionManager, ConnectionSettings, ListFilters};
//!
//! let manager = ConnectionManager::new(connector, ConnectionSettings::from_env());
//! let handle = manager.ensure_ready().await?;
//! let query = build_list_query(&ListFilters::default());
//! ```

pub mod connection;
pub mod domain;
pub mod memory;
pub mod ports;

// Re-export commonly used types
pub use connection::{ConnectionManager, ConnectionSettings, ConnectionState};
pub use domain::{
    build_list_query, distinct_makes, distinct_years, normalize, ConnectionError, DomainError,
    FuelType, ListFilters, ListQuery, NewVehicle, RawListFilters, SortOrder, Transmission,
    Vehicle, VehiclePatch, VehicleRecord, YearConstraint,
};
pub use memory::InMemoryStore;
pub use ports::{StoreConnector, VehicleRepository};
