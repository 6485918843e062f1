//! Cell-related types
//!
//! This module contains:
//! - [`Position`] - A cell's location (e.g., "A1", "$B$2")
//! - [`ContentValue`] - The value a cell evaluates to

mod position;
mod value;

pub use position::Position;
pub use value::ContentValue;
