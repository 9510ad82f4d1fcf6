//! Shared command model for event scripts containing choice menus.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_commands};
