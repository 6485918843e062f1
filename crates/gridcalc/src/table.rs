//! Sparse formula table
//!
//! A [`Table`] maps positions to formula trees. Positions without an entry
//! behave like cells holding the absent literal. Values are never cached:
//! every [`Table::get_value`] checks for cycles and evaluates from scratch.

use crate::error::Result;
use crate::record::{RecordOptions, RecordReader, RecordWriter};
use ahash::{AHashMap, AHashSet};
use gridcalc_core::{ContentValue, Position};
use gridcalc_formula::{has_circular_reference, parse_formula, EvaluationContext, Expr};
use std::io::{Read, Write};
use std::ops::BitOr;
use std::path::Path;

/// Feature flags a table advertises to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u32);

impl Capabilities {
    /// Circular references evaluate to absent instead of looping
    pub const CYCLIC_DEPS: Capabilities = Capabilities(0x01);
    /// Spreadsheet functions (`SUM`, `IF`, ...)
    pub const FUNCTIONS: Capabilities = Capabilities(0x02);
    /// Save/load support
    pub const FILE_IO: Capabilities = Capabilities(0x04);
    /// Cached or incremental evaluation
    pub const SPEED: Capabilities = Capabilities(0x08);
    /// Ships its own formula parser
    pub const PARSER: Capabilities = Capabilities(0x10);

    /// Raw flag bits
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Check if every flag in `other` is set
    pub fn contains(self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        Capabilities(self.0 | rhs.0)
    }
}

/// Sparse map from cell position to formula tree
///
/// Keys never carry `$` markers; references inside the stored trees keep
/// theirs.
#[derive(Debug, Clone, Default)]
pub struct Table {
    cells: AHashMap<Position, Expr>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// What this table supports
    pub fn capabilities() -> Capabilities {
        Capabilities::CYCLIC_DEPS | Capabilities::FILE_IO
    }

    /// Number of cells with an entry
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if no cell has an entry
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if `pos` has an entry
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains_key(&pos)
    }

    /// Positions with an entry, sorted row-major
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.cells.keys().copied().collect();
        positions.sort();
        positions
    }

    /// Entries sorted row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Expr)> + '_ {
        self.positions()
            .into_iter()
            .map(move |pos| (pos, self.get_cell(pos)))
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Parse `contents` and store the result at `pos`
    ///
    /// Text starting with `=` is a formula; other text is a number or a
    /// string literal. On error the table is unchanged.
    pub fn set_cell(&mut self, pos: Position, contents: &str) -> Result<()> {
        let expr = parse_formula(contents).map_err(|e| {
            log::debug!("rejected contents for {}: {}", pos, e);
            e
        })?;
        self.set_cell_expr(pos, expr);
        Ok(())
    }

    /// Store an already built tree at `pos`
    pub fn set_cell_expr(&mut self, pos: Position, expr: Expr) {
        self.cells.insert(pos.relative(), expr);
    }

    /// The tree stored at `pos`, or the shared absent literal.
    /// Does not evaluate.
    pub fn get_cell(&self, pos: Position) -> &Expr {
        self.cells.get(&pos).unwrap_or_else(|| Expr::absent())
    }

    /// Evaluate the cell at `pos`
    ///
    /// Returns [`ContentValue::Absent`] without evaluating when a circular
    /// reference is reachable from `pos`.
    pub fn get_value(&self, pos: Position) -> ContentValue {
        if has_circular_reference(self, pos) {
            return ContentValue::Absent;
        }
        self.get_cell(pos).evaluate(self)
    }

    /// Copy a `width` × `height` rectangle from `src` to `dst`
    ///
    /// Both rectangles are walked with [`Position::shift_by`], so an axis
    /// marked absolute on an origin stays on that origin's row or column.
    /// Relative references in the copies move by the distance between the
    /// two origins. Destination cells whose source is empty are removed.
    /// All copies are taken before anything is written, so overlapping
    /// rectangles behave as if copied from a snapshot. When the walk lands
    /// on the same destination more than once, the first copy wins.
    pub fn copy_rect(&mut self, dst: Position, src: Position, width: u32, height: u32) {
        let (row_delta, col_delta) = dst.delta_from(&src);
        let mut staged: Vec<(Position, Option<Expr>)> = Vec::new();
        let mut seen = AHashSet::new();

        for i in 0..height as i64 {
            for j in 0..width as i64 {
                let to = dst.shifted(i, j).relative();
                if !seen.insert(to) {
                    continue;
                }
                let from = src.shifted(i, j);
                let copy = self.cells.get(&from).map(|expr| {
                    let mut copy = expr.clone();
                    copy.shift_references(row_delta, col_delta);
                    copy
                });
                staged.push((to, copy));
            }
        }

        log::trace!(
            "copy {}x{} from {} to {}: {} cells staged",
            width,
            height,
            src,
            dst,
            staged.len()
        );

        for (to, copy) in staged {
            match copy {
                Some(expr) => {
                    self.cells.insert(to, expr);
                }
                None => {
                    self.cells.remove(&to);
                }
            }
        }
    }

    /// Replace the contents with `cells`
    pub(crate) fn replace_cells(&mut self, cells: AHashMap<Position, Expr>) {
        self.cells = cells;
    }

    // === I/O ===

    /// Write the table in the record format with default options
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        RecordWriter::write(self, writer, &RecordOptions::default())
    }

    /// Replace the contents with a table read in the record format
    ///
    /// On error the table is left empty.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        RecordReader::read(self, reader, &RecordOptions::default())
    }

    /// Save to a file
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        RecordWriter::write_file(self, path, &RecordOptions::default())
    }

    /// Load from a file
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        RecordReader::read_file(self, path, &RecordOptions::default())
    }
}

impl EvaluationContext for Table {
    fn cell_expr(&self, pos: &Position) -> &Expr {
        self.get_cell(*pos)
    }
}
