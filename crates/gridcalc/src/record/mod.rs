//! Record stream format
//!
//! A saved table is a sequence of separator-terminated fields. The first
//! field is the number of cells. Each cell follows as two length-prefixed
//! strings, its position and its formula text:
//!
//! ```text
//! 2|2|A1|3|=10|2|B1|7|=(A1+1)|
//! ```
//!
//! Lengths count bytes. Formula text always starts with `=` and uses the
//! fully parenthesized form produced by `Display` for [`Expr`](crate::Expr).

mod options;
mod reader;
mod writer;

pub use options::RecordOptions;
pub use reader::RecordReader;
pub use writer::RecordWriter;
