//! # gridcalc-formula
//!
//! Formula trees for gridcalc.
//!
//! This crate provides:
//! - [`Expr`] - The formula tree (literals, references, operators)
//! - [`ExprBuilder`] - The callback interface a parser drives to build a tree
//! - [`parse_expression`] / [`parse_formula`] - Cell text → builder calls / tree
//! - [`evaluate`] - Tree → [`ContentValue`](gridcalc_core::ContentValue)
//! - [`has_circular_reference`] - Cycle detection over cell references
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::ContentValue;
//! use gridcalc_formula::{evaluate, parse_formula, EmptyContext};
//!
//! let ast = parse_formula("=(1+2)*3").unwrap();
//! assert_eq!(ast.to_string(), "((1+2)*3)");
//! assert_eq!(evaluate(&ast, &EmptyContext), ContentValue::Number(9.0));
//! ```

pub mod ast;
pub mod builder;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use builder::{AstBuilder, ExprBuilder};
pub use dependency::has_circular_reference;
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EmptyContext, EvaluationContext};
pub use parser::{parse_expression, parse_formula};
