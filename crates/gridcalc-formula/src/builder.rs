//! Builder callback interface
//!
//! A parser reports what it recognises through [`ExprBuilder`], in postfix
//! order: operands first, then the operator that combines them. On success
//! exactly one tree is left on the builder's stack.

use crate::ast::{BinaryOperator, Expr};
use crate::error::{FormulaError, FormulaResult};
use gridcalc_core::{ContentValue, Position};

/// Callbacks a formula parser drives while it walks the text
pub trait ExprBuilder {
    fn op_add(&mut self) -> FormulaResult<()>;
    fn op_sub(&mut self) -> FormulaResult<()>;
    fn op_mul(&mut self) -> FormulaResult<()>;
    fn op_div(&mut self) -> FormulaResult<()>;
    fn op_pow(&mut self) -> FormulaResult<()>;
    fn op_neg(&mut self) -> FormulaResult<()>;
    fn op_eq(&mut self) -> FormulaResult<()>;
    fn op_ne(&mut self) -> FormulaResult<()>;
    fn op_lt(&mut self) -> FormulaResult<()>;
    fn op_le(&mut self) -> FormulaResult<()>;
    fn op_gt(&mut self) -> FormulaResult<()>;
    fn op_ge(&mut self) -> FormulaResult<()>;

    fn val_number(&mut self, value: f64) -> FormulaResult<()>;
    fn val_string(&mut self, value: String) -> FormulaResult<()>;
    /// `text` is a cell address such as `A1` or `$B$2`
    fn val_reference(&mut self, text: &str) -> FormulaResult<()>;
    /// `text` is a range such as `A1:B2`
    fn val_range(&mut self, text: &str) -> FormulaResult<()>;
    /// Called after the `param_count` arguments have been pushed
    fn func_call(&mut self, name: &str, param_count: usize) -> FormulaResult<()>;
}

/// Builds an [`Expr`] tree on a value stack
#[derive(Debug, Default)]
pub struct AstBuilder {
    stack: Vec<Expr>,
}

impl AstBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trees currently on the stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Take the finished tree
    pub fn finish(mut self) -> FormulaResult<Expr> {
        match self.stack.len() {
            1 => self
                .stack
                .pop()
                .ok_or(FormulaError::IncompleteExpression(0)),
            n => Err(FormulaError::IncompleteExpression(n)),
        }
    }

    fn pop(&mut self, symbol: &'static str) -> FormulaResult<Expr> {
        self.stack.pop().ok_or(FormulaError::StackUnderflow(symbol))
    }

    fn binary(&mut self, op: BinaryOperator) -> FormulaResult<()> {
        if self.stack.len() < 2 {
            return Err(FormulaError::StackUnderflow(op.symbol()));
        }
        let right = self.pop(op.symbol())?;
        let left = self.pop(op.symbol())?;
        self.stack.push(Expr::binary(op, left, right));
        Ok(())
    }
}

impl ExprBuilder for AstBuilder {
    fn op_add(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::Add)
    }

    fn op_sub(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::Subtract)
    }

    fn op_mul(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::Multiply)
    }

    fn op_div(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::Divide)
    }

    fn op_pow(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::Power)
    }

    fn op_neg(&mut self) -> FormulaResult<()> {
        let operand = self.pop("-")?;
        self.stack.push(Expr::negate(operand));
        Ok(())
    }

    fn op_eq(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::Equal)
    }

    fn op_ne(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::NotEqual)
    }

    fn op_lt(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::LessThan)
    }

    fn op_le(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::LessEqual)
    }

    fn op_gt(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::GreaterThan)
    }

    fn op_ge(&mut self) -> FormulaResult<()> {
        self.binary(BinaryOperator::GreaterEqual)
    }

    fn val_number(&mut self, value: f64) -> FormulaResult<()> {
        self.stack.push(Expr::Literal(ContentValue::Number(value)));
        Ok(())
    }

    fn val_string(&mut self, value: String) -> FormulaResult<()> {
        self.stack.push(Expr::Literal(ContentValue::Text(value)));
        Ok(())
    }

    fn val_reference(&mut self, text: &str) -> FormulaResult<()> {
        let pos = Position::parse(text)?;
        self.stack.push(Expr::Reference(pos));
        Ok(())
    }

    fn val_range(&mut self, text: &str) -> FormulaResult<()> {
        Err(FormulaError::Unsupported(format!("range reference {}", text)))
    }

    fn func_call(&mut self, name: &str, _param_count: usize) -> FormulaResult<()> {
        Err(FormulaError::Unsupported(format!("function {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_postfix_calls_build_tree() {
        // 1 - A2 * 3
        let mut b = AstBuilder::new();
        b.val_number(1.0).unwrap();
        b.val_reference("A2").unwrap();
        b.val_number(3.0).unwrap();
        b.op_mul().unwrap();
        b.op_sub().unwrap();
        assert_eq!(b.finish().unwrap().to_string(), "(1-(A2*3))");
    }

    #[test]
    fn test_negate_and_compare() {
        let mut b = AstBuilder::new();
        b.val_string("x".into()).unwrap();
        b.op_neg().unwrap();
        b.val_number(2.0).unwrap();
        b.op_ge().unwrap();
        assert_eq!(b.finish().unwrap().to_string(), "((-\"x\")>=2)");
    }

    #[test]
    fn test_underflow() {
        let mut b = AstBuilder::new();
        b.val_number(1.0).unwrap();
        assert_eq!(b.op_add(), Err(FormulaError::StackUnderflow("+")));
        // The lone operand is still there
        assert_eq!(b.depth(), 1);

        let mut b = AstBuilder::new();
        assert_eq!(b.op_neg(), Err(FormulaError::StackUnderflow("-")));
    }

    #[test]
    fn test_finish_requires_single_tree() {
        assert_eq!(
            AstBuilder::new().finish(),
            Err(FormulaError::IncompleteExpression(0))
        );

        let mut b = AstBuilder::new();
        b.val_number(1.0).unwrap();
        b.val_number(2.0).unwrap();
        assert_eq!(b.finish(), Err(FormulaError::IncompleteExpression(2)));
    }

    #[test]
    fn test_ranges_and_functions_are_rejected() {
        let mut b = AstBuilder::new();
        assert!(matches!(b.val_range("A1:B2"), Err(FormulaError::Unsupported(_))));
        assert!(matches!(b.func_call("SUM", 1), Err(FormulaError::Unsupported(_))));
    }

    #[test]
    fn test_bad_reference() {
        let mut b = AstBuilder::new();
        assert!(matches!(b.val_reference("1A"), Err(FormulaError::Position(_))));
    }
}
