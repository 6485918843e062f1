//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    Capabilities,
    // Value and addressing
    ContentValue,
    // Error types
    Error,
    Expr,
    Position,
    // I/O types
    RecordOptions,
    RecordReader,
    RecordWriter,
    Result,
    // Main types
    Table,
};
