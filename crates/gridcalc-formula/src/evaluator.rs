//! Formula evaluator
//!
//! Evaluates formula trees to produce values. References are resolved
//! through an [`EvaluationContext`] and evaluated recursively, so callers
//! must rule out cycles first (see [`crate::has_circular_reference`]).

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use gridcalc_core::{ContentValue, Position};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Source of the formula stored at each position
pub trait EvaluationContext {
    /// The tree stored at `pos`, or [`Expr::absent`] when there is none
    fn cell_expr(&self, pos: &Position) -> &Expr;
}

/// Context in which every cell is empty
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContext;

impl EvaluationContext for EmptyContext {
    fn cell_expr(&self, _pos: &Position) -> &Expr {
        Expr::absent()
    }
}

impl<S: BuildHasher> EvaluationContext for HashMap<Position, Expr, S> {
    fn cell_expr(&self, pos: &Position) -> &Expr {
        self.get(pos).unwrap_or_else(|| Expr::absent())
    }
}

/// Evaluate a formula tree
pub fn evaluate<C>(expr: &Expr, ctx: &C) -> ContentValue
where
    C: EvaluationContext + ?Sized,
{
    expr.evaluate(ctx)
}

impl Expr {
    /// Evaluate this tree, resolving references through `ctx`
    pub fn evaluate<C>(&self, ctx: &C) -> ContentValue
    where
        C: EvaluationContext + ?Sized,
    {
        match self {
            Expr::Literal(value) => value.clone(),
            Expr::Reference(pos) => ctx.cell_expr(pos).evaluate(ctx),
            Expr::Unary { op, operand } => op.apply(&operand.evaluate(ctx)),
            Expr::Binary { op, left, right } => {
                op.apply(&left.evaluate(ctx), &right.evaluate(ctx))
            }
        }
    }
}

impl BinaryOperator {
    /// Apply the operator to two evaluated operands
    pub fn apply(self, left: &ContentValue, right: &ContentValue) -> ContentValue {
        let result = self.combine(left, right);
        if result.is_absent() && !left.is_absent() && !right.is_absent() {
            log::trace!(
                "{} {} {} has no value",
                left.type_name(),
                self.symbol(),
                right.type_name()
            );
        }
        result
    }

    fn combine(self, left: &ContentValue, right: &ContentValue) -> ContentValue {
        match self {
            BinaryOperator::Add => left.plus(right),
            BinaryOperator::Subtract => left.minus(right),
            BinaryOperator::Multiply => left.times(right),
            BinaryOperator::Divide => left.divide(right),
            BinaryOperator::Power => left.power(right),
            BinaryOperator::LessThan => left.less_than(right),
            BinaryOperator::GreaterThan => left.greater_than(right),
            BinaryOperator::LessEqual => left.less_equal(right),
            BinaryOperator::GreaterEqual => left.greater_equal(right),
            BinaryOperator::Equal => left.equal(right),
            BinaryOperator::NotEqual => left.not_equal(right),
        }
    }
}

impl UnaryOperator {
    /// Apply the operator to an evaluated operand
    pub fn apply(self, operand: &ContentValue) -> ContentValue {
        match self {
            UnaryOperator::Negate => operand.negate(),
        }
    }
}
