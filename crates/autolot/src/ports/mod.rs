//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with the persisted store.
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod connector;
pub mod repositories;

// Re-exports
pub use connector::*;
pub use repositories::*;
