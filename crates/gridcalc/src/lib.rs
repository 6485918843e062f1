//! # gridcalc
//!
//! A formula engine over a sparse, unbounded grid of cells.
//!
//! ## Features
//!
//! - Cells hold formula trees built from text (`=A1*2`, `10`, `Hello`)
//! - Reading a cell evaluates its tree, following references on demand
//! - Circular references are detected on every read and evaluate to absent
//! - Rectangles of cells can be copied with relative references shifted
//! - Tables save to and load from a length-delimited text format
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut table = Table::new();
//! let a1: Position = "A1".parse().unwrap();
//! let b1: Position = "B1".parse().unwrap();
//!
//! table.set_cell(a1, "10").unwrap();
//! table.set_cell(b1, "=A1+1").unwrap();
//! assert_eq!(table.get_value(b1), ContentValue::Number(11.0));
//!
//! let mut buf = Vec::new();
//! table.save(&mut buf).unwrap();
//!
//! let mut copy = Table::new();
//! copy.load(buf.as_slice()).unwrap();
//! assert_eq!(copy.get_value(b1), ContentValue::Number(11.0));
//! ```

pub mod error;
pub mod prelude;
pub mod record;
pub mod table;

pub use error::{Error, Result};
pub use record::{RecordOptions, RecordReader, RecordWriter};
pub use table::{Capabilities, Table};

// Re-export core types
pub use gridcalc_core::{ContentValue, Position};

// Re-export formula types
pub use gridcalc_formula::{
    evaluate, parse_expression, parse_formula, AstBuilder, BinaryOperator, EvaluationContext,
    Expr, ExprBuilder, FormulaError, FormulaResult, UnaryOperator,
};
