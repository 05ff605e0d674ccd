//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod fuel_type;
mod transmission;

pub use fuel_type::*;
pub use transmission::*;
