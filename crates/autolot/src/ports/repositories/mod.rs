//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod vehicle_repository;

pub use vehicle_repository::*;
