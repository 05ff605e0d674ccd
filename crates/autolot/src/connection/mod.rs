//! Store Connection Lifecycle
//!
//! A single, lazily established link to the persisted store, shared by every
//! request in the process and re-verified before each use.

mod manager;
mod settings;

pub use manager::*;
pub use settings::*;
