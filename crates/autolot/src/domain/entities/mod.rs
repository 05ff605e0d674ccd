//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - NewVehicle / VehiclePatch: validated write payloads
//! - VehicleRecord: a row as the store holds it
//! - Vehicle: the public listing shape served to clients

mod vehicle;

pub use vehicle::*;
