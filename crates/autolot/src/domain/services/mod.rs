//! Domain Services
//!
//! Stateless operations that don't belong to a single entity.

mod query_translator;

pub use query_translator::*;
