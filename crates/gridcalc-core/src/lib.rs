//! # gridcalc-core
//!
//! Core data types for the gridcalc formula engine.
//!
//! This crate provides:
//! - [`Position`] - Cell addressing (`B3`, `$A$1`) with relative/absolute markers
//! - [`ContentValue`] - The three-way value produced by evaluation and its operator algebra
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{ContentValue, Position};
//!
//! let pos = Position::parse("$B12").unwrap();
//! assert_eq!(pos.col, 1);
//! assert_eq!(pos.row, 12);
//! assert!(pos.col_absolute);
//!
//! let sum = ContentValue::Number(1.0).plus(&ContentValue::Number(2.0));
//! assert_eq!(sum, ContentValue::Number(3.0));
//! ```

pub mod cell;
pub mod error;

pub use cell::{ContentValue, Position};
pub use error::{Error, Result};
