//! Autolot Data Models
//!
//! Request/response DTOs for the HTTP API. Wire names are camelCase.

mod health;
mod vehicle;

pub use health::*;
pub use vehicle::*;
