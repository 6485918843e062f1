//! Circular reference detection
//!
//! The search is an iterative depth-first walk over the reference relation,
//! driven by an explicit stack of enter/exit frames so that long reference
//! chains cannot exhaust the call stack. Nothing is cached between calls.

use crate::evaluator::EvaluationContext;
use gridcalc_core::Position;
use std::collections::HashSet;

/// Step of the depth-first walk
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// First visit: mark as on-path and schedule the dependencies
    Enter(Position),
    /// All dependencies explored: move from on-path to done
    Exit(Position),
}

/// Check whether a cycle is reachable from `start`
///
/// This includes `start` referring to itself, directly or through other
/// cells, and cycles further down the chain that `start` would read.
pub fn has_circular_reference<C>(ctx: &C, start: Position) -> bool
where
    C: EvaluationContext + ?Sized,
{
    let mut stack = vec![Frame::Enter(start)];
    // Cells on the current path
    let mut in_stack: HashSet<Position> = HashSet::new();
    // Cells whose dependencies are fully explored
    let mut visited: HashSet<Position> = HashSet::new();
    let mut dependencies = HashSet::new();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Exit(cell) => {
                in_stack.remove(&cell);
                visited.insert(cell);
            }
            Frame::Enter(cell) => {
                if visited.contains(&cell) || in_stack.contains(&cell) {
                    continue;
                }
                in_stack.insert(cell);
                stack.push(Frame::Exit(cell));

                dependencies.clear();
                ctx.cell_expr(&cell).collect_dependencies(&mut dependencies);
                for &dependency in &dependencies {
                    if in_stack.contains(&dependency) {
                        log::trace!("circular reference {} -> {}", cell, dependency);
                        return true;
                    }
                    if !visited.contains(&dependency) {
                        stack.push(Frame::Enter(dependency));
                    }
                }
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::parser::parse_formula;
    use std::collections::HashMap;

    fn sheet(cells: &[(&str, &str)]) -> HashMap<Position, Expr> {
        cells
            .iter()
            .map(|(pos, text)| (Position::parse(pos).unwrap(), parse_formula(text).unwrap()))
            .collect()
    }

    fn cycle_at(cells: &HashMap<Position, Expr>, pos: &str) -> bool {
        has_circular_reference(cells, Position::parse(pos).unwrap())
    }

    #[test]
    fn test_self_reference() {
        let cells = sheet(&[("A1", "=A1")]);
        assert!(cycle_at(&cells, "A1"));

        let cells = sheet(&[("A1", "=1+$A$1*2")]);
        assert!(cycle_at(&cells, "A1"));
    }

    #[test]
    fn test_circular_reference() {
        // A1 -> B1 -> C1 -> A1 (circular)
        let cells = sheet(&[("A1", "=B1"), ("B1", "=C1+1"), ("C1", "=A1")]);
        assert!(cycle_at(&cells, "A1"));
        assert!(cycle_at(&cells, "B1"));
        assert!(cycle_at(&cells, "C1"));
    }

    #[test]
    fn test_cycle_downstream_is_reported() {
        // D1 is not on the loop but reads it
        let cells = sheet(&[("D1", "=A1"), ("A1", "=B1"), ("B1", "=A1")]);
        assert!(cycle_at(&cells, "D1"));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        // A1 reads B1 and C1, both read D1
        let cells = sheet(&[
            ("A1", "=B1+C1"),
            ("B1", "=D1*2"),
            ("C1", "=D1-1"),
            ("D1", "5"),
        ]);
        assert!(!cycle_at(&cells, "A1"));
        assert!(!cycle_at(&cells, "D1"));
        assert!(!cycle_at(&cells, "Q9"));
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        let mut cells = HashMap::new();
        for row in 1..50_000u32 {
            cells.insert(
                Position::new(row, 0),
                Expr::Reference(Position::new(row + 1, 0)),
            );
        }
        assert!(!has_circular_reference(&cells, Position::new(1, 0)));

        cells.insert(Position::new(50_000, 0), Expr::Reference(Position::new(1, 0)));
        assert!(has_circular_reference(&cells, Position::new(1, 0)));
    }
}
