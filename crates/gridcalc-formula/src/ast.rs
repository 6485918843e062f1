//! Formula tree types
//!
//! Every node owns its children. `Clone` is a deep copy, so a copied
//! formula can have its references shifted without touching the original.

use gridcalc_core::{ContentValue, Position};
use std::collections::HashSet;
use std::fmt;

/// The tree stored for a cell that has no entry
static ABSENT: Expr = Expr::Literal(ContentValue::Absent);

/// Formula expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant value
    Literal(ContentValue),
    /// Single cell reference
    Reference(Position),
    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
}

impl BinaryOperator {
    /// Every binary operator
    pub const ALL: [BinaryOperator; 11] = [
        BinaryOperator::Add,
        BinaryOperator::Subtract,
        BinaryOperator::Multiply,
        BinaryOperator::Divide,
        BinaryOperator::Power,
        BinaryOperator::LessThan,
        BinaryOperator::GreaterThan,
        BinaryOperator::LessEqual,
        BinaryOperator::GreaterEqual,
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
    ];

    /// Spelling used when printing a formula
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::LessThan => "<",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
        }
    }

    /// Check if this is a comparison operator
    pub fn is_comparison(self) -> bool {
        !matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Power
        )
    }
}

impl UnaryOperator {
    /// Spelling used when printing a formula
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
        }
    }
}

impl Expr {
    /// The shared tree standing in for an empty cell
    pub fn absent() -> &'static Expr {
        &ABSENT
    }

    /// Build a binary node
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a negation node
    pub fn negate(operand: Expr) -> Expr {
        Expr::Unary {
            op: UnaryOperator::Negate,
            operand: Box::new(operand),
        }
    }

    /// Add every position this tree reads to `dependencies`
    pub fn collect_dependencies(&self, dependencies: &mut HashSet<Position>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Reference(pos) => {
                dependencies.insert(*pos);
            }
            Expr::Unary { operand, .. } => operand.collect_dependencies(dependencies),
            Expr::Binary { left, right, .. } => {
                left.collect_dependencies(dependencies);
                right.collect_dependencies(dependencies);
            }
        }
    }

    /// Positions this tree reads, as a fresh set
    pub fn dependencies(&self) -> HashSet<Position> {
        let mut dependencies = HashSet::new();
        self.collect_dependencies(&mut dependencies);
        dependencies
    }

    /// Move every reference by the given deltas, honouring each
    /// reference's own `$` markers
    pub fn shift_references(&mut self, row_delta: i64, col_delta: i64) {
        match self {
            Expr::Literal(_) => {}
            Expr::Reference(pos) => pos.shift_by(row_delta, col_delta),
            Expr::Unary { operand, .. } => operand.shift_references(row_delta, col_delta),
            Expr::Binary { left, right, .. } => {
                left.shift_references(row_delta, col_delta);
                right.shift_references(row_delta, col_delta);
            }
        }
    }
}

/// Fully parenthesized infix form, e.g. `(A1+2)` or `(-(B$3*"x"))`
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Reference(pos) => write!(f, "{}", pos),
            Expr::Unary { op, operand } => write!(f, "({}{})", op.symbol(), operand),
            Expr::Binary { op, left, right } => write!(f, "({}{}{})", left, op.symbol(), right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(text: &str) -> Expr {
        Expr::Reference(Position::parse(text).unwrap())
    }

    #[test]
    fn test_print_is_fully_parenthesized() {
        let expr = Expr::binary(
            BinaryOperator::Add,
            reference("A1"),
            Expr::binary(
                BinaryOperator::Multiply,
                Expr::Literal(ContentValue::Number(2.0)),
                Expr::negate(reference("$B$2")),
            ),
        );
        assert_eq!(expr.to_string(), "(A1+(2*(-$B$2)))");

        let cmp = Expr::binary(
            BinaryOperator::NotEqual,
            Expr::Literal(ContentValue::text("a\"b")),
            Expr::Literal(ContentValue::Number(0.5)),
        );
        assert_eq!(cmp.to_string(), "(\"a\"\"b\"<>0.5)");
    }

    #[test]
    fn test_dependencies() {
        let expr = Expr::binary(
            BinaryOperator::Subtract,
            reference("A1"),
            Expr::binary(BinaryOperator::Power, reference("B2"), reference("$A$1")),
        );
        let deps = expr.dependencies();
        assert_eq!(deps.len(), 2);
        assert!(deps.contains(&Position::new(1, 0)));
        assert!(deps.contains(&Position::new(2, 1)));

        assert!(Expr::absent().dependencies().is_empty());
    }

    #[test]
    fn test_shift_on_clone_leaves_source_untouched() {
        let source = Expr::binary(
            BinaryOperator::Add,
            reference("A1"),
            Expr::binary(BinaryOperator::Add, reference("A$1"), reference("$A1")),
        );
        let mut copy = source.clone();
        copy.shift_references(2, 3);

        assert_eq!(source.to_string(), "(A1+(A$1+$A1))");
        assert_eq!(copy.to_string(), "(D3+(D$1+$A3))");
    }

    #[test]
    fn test_comparison_flag() {
        let comparisons: Vec<_> = BinaryOperator::ALL
            .iter()
            .filter(|op| op.is_comparison())
            .collect();
        assert_eq!(comparisons.len(), 6);
    }
}
