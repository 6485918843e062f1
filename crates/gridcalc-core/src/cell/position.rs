//! Cell position type and its A1-style text codec

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A cell position (e.g., "A1", "$B$2")
///
/// Columns are stored 0-based (`A` = 0). Rows are stored exactly as written,
/// so `A1` has `row == 1` and `A0` is a valid position with `row == 0`.
/// The optional `$` markers make an axis absolute: [`Position::shift_by`]
/// leaves that axis untouched.
///
/// Equality, hashing and ordering only look at the coordinates, never at
/// the markers. Ordering is row-major.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Row number, as written in the address text
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., Z=25, AA=26)
    pub col: u32,
    /// Whether the row is absolute (`$` before the digits)
    pub row_absolute: bool,
    /// Whether the column is absolute (`$` before the letters)
    pub col_absolute: bool,
}

impl Position {
    /// Create a new position with relative axes
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create a new position with specified absolute/relative flags
    pub fn with_absolute(row: u32, col: u32, row_absolute: bool, col_absolute: bool) -> Self {
        Self {
            row,
            col,
            row_absolute,
            col_absolute,
        }
    }

    /// Parse a position from `['$'] letters+ ['$'] digits+`
    ///
    /// Letters are case-insensitive. The whole input must match; nothing is
    /// trimmed.
    ///
    /// # Examples
    /// ```
    /// use gridcalc_core::Position;
    ///
    /// let pos = Position::parse("B2").unwrap();
    /// assert_eq!(pos.row, 2);
    /// assert_eq!(pos.col, 1);
    ///
    /// let pos = Position::parse("$aa$10").unwrap();
    /// assert_eq!(pos.col, 26);
    /// assert!(pos.row_absolute);
    /// assert!(pos.col_absolute);
    ///
    /// assert!(Position::parse("B2 ").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::position("empty position"));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let col_absolute = if bytes.first() == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::position(format!("no column letters in '{}'", s)));
        }
        let col = Self::letters_to_column(&s[col_start..pos])?;

        let row_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let row_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == row_start {
            return Err(Error::position(format!("no row number in '{}'", s)));
        }
        if pos != bytes.len() {
            return Err(Error::position(format!(
                "unexpected trailing input '{}' in '{}'",
                &s[pos..],
                s
            )));
        }

        let row: u32 = s[row_start..]
            .parse()
            .map_err(|_| Error::position(format!("row number out of range in '{}'", s)))?;

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut result = String::new();
        let mut n = col as u64 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::position("empty column letters"));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::position(format!("invalid column letter '{}'", c)));
            }
            let digit = (c.to_ascii_uppercase() as u64) - ('A' as u64) + 1;
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| Error::position(format!("column '{}' out of range", letters)))?;
        }

        u32::try_from(col - 1)
            .map_err(|_| Error::position(format!("column '{}' out of range", letters)))
    }

    /// Format as A1-style string, `$` markers included
    pub fn to_a1_string(&self) -> String {
        let mut result = String::new();

        if self.col_absolute {
            result.push('$');
        }
        result.push_str(&Self::column_to_letters(self.col));

        if self.row_absolute {
            result.push('$');
        }
        result.push_str(&self.row.to_string());

        result
    }

    /// Move the relative axes by the given deltas.
    ///
    /// Absolute axes are left untouched. Relative axes wrap around on
    /// overflow or underflow.
    pub fn shift_by(&mut self, row_delta: i64, col_delta: i64) {
        if !self.row_absolute {
            self.row = wrapping_offset(self.row, row_delta);
        }
        if !self.col_absolute {
            self.col = wrapping_offset(self.col, col_delta);
        }
    }

    /// Copy of this position moved by [`Position::shift_by`]
    pub fn shifted(mut self, row_delta: i64, col_delta: i64) -> Self {
        self.shift_by(row_delta, col_delta);
        self
    }

    /// Copy of this position with both `$` markers cleared
    pub fn relative(&self) -> Self {
        Self::new(self.row, self.col)
    }

    /// Signed `(rows, cols)` distance from `origin` to `self`
    pub fn delta_from(&self, origin: &Position) -> (i64, i64) {
        (
            self.row as i64 - origin.row as i64,
            self.col as i64 - origin.col as i64,
        )
    }
}

fn wrapping_offset(value: u32, delta: i64) -> u32 {
    (value as i64).wrapping_add(delta) as u32
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row.hash(state);
        self.col.hash(state);
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.col.cmp(&other.col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(Position::column_to_letters(0), "A");
        assert_eq!(Position::column_to_letters(1), "B");
        assert_eq!(Position::column_to_letters(25), "Z");
        assert_eq!(Position::column_to_letters(26), "AA");
        assert_eq!(Position::column_to_letters(27), "AB");
        assert_eq!(Position::column_to_letters(701), "ZZ");
        assert_eq!(Position::column_to_letters(702), "AAA");
        assert_eq!(Position::column_to_letters(730), "ABC");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(Position::letters_to_column("A").unwrap(), 0);
        assert_eq!(Position::letters_to_column("Z").unwrap(), 25);
        assert_eq!(Position::letters_to_column("AA").unwrap(), 26);
        assert_eq!(Position::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(Position::letters_to_column("AAA").unwrap(), 702);

        // Case insensitive
        assert_eq!(Position::letters_to_column("a").unwrap(), 0);
        assert_eq!(Position::letters_to_column("aBc").unwrap(), 730);
    }

    #[test]
    fn test_parse_keeps_row_as_written() {
        let pos = Position::parse("A23").unwrap();
        assert_eq!(pos.col, 0);
        assert_eq!(pos.row, 23);
        assert!(!pos.row_absolute);
        assert!(!pos.col_absolute);

        let pos = Position::parse("A0").unwrap();
        assert_eq!(pos.row, 0);
    }

    #[test]
    fn test_parse_absolute_markers() {
        let pos = Position::parse("$B23").unwrap();
        assert!(pos.col_absolute);
        assert!(!pos.row_absolute);

        let pos = Position::parse("B$23").unwrap();
        assert!(!pos.col_absolute);
        assert!(pos.row_absolute);

        let pos = Position::parse("$B$1234").unwrap();
        assert_eq!(pos.col, 1);
        assert_eq!(pos.row, 1234);
        assert!(pos.col_absolute);
        assert!(pos.row_absolute);
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "", "A", "1", "$", "$$1", "A$", "$B$1234.;[]", "B[]", "0314985", "[][][]][]",
            " A1", "A1 ", "A-1", "A1B", "A$$1", "Ä1", "A99999999999",
        ] {
            assert!(
                matches!(Position::parse(bad), Err(Error::PositionSyntax(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(1, 0).to_string(), "A1");
        assert_eq!(Position::new(100, 2).to_string(), "C100");
        assert_eq!(Position::with_absolute(7, 27, true, false).to_string(), "AB$7");
        assert_eq!(Position::with_absolute(7, 27, false, true).to_string(), "$AB7");
        assert_eq!(Position::parse("$a$5").unwrap().to_string(), "$A$5");
    }

    #[test]
    fn test_equality_ignores_markers() {
        assert_eq!(Position::parse("$C$3").unwrap(), Position::parse("C3").unwrap());
        assert!(Position::parse("B9").unwrap() < Position::parse("A10").unwrap());
        assert!(Position::parse("A10").unwrap() < Position::parse("B10").unwrap());
    }

    #[test]
    fn test_shift_respects_markers() {
        let mut pos = Position::parse("B2").unwrap();
        pos.shift_by(3, -1);
        assert_eq!(pos, Position::new(5, 0));

        let mut pos = Position::parse("B$2").unwrap();
        pos.shift_by(3, 2);
        assert_eq!(pos, Position::new(2, 3));

        let mut pos = Position::parse("$B2").unwrap();
        pos.shift_by(3, 2);
        assert_eq!(pos, Position::new(5, 1));

        let mut pos = Position::parse("$B$2").unwrap();
        pos.shift_by(3, 2);
        assert_eq!(pos, Position::new(2, 1));
    }

    #[test]
    fn test_shifted_keeps_markers() {
        let origin = Position::parse("$B2").unwrap();
        let moved = origin.shifted(1, 1);
        assert_eq!(moved, Position::new(3, 1));
        assert!(moved.col_absolute && !moved.row_absolute);
        assert_eq!(moved.to_string(), "$B3");
    }

    #[test]
    fn test_shift_wraps_and_still_round_trips() {
        let mut pos = Position::new(0, 0);
        pos.shift_by(-1, -1);
        assert_eq!(pos.row, u32::MAX);
        assert_eq!(pos.col, u32::MAX);
        assert_eq!(Position::parse(&pos.to_string()).unwrap(), pos);
    }

    proptest! {
        #[test]
        fn prop_position_round_trips(
            row in 0u32..=1000,
            col in 0u32..=1000,
            row_absolute: bool,
            col_absolute: bool,
        ) {
            let pos = Position::with_absolute(row, col, row_absolute, col_absolute);
            let parsed = Position::parse(&pos.to_a1_string()).unwrap();
            prop_assert_eq!(parsed.row, row);
            prop_assert_eq!(parsed.col, col);
            prop_assert_eq!(parsed.row_absolute, row_absolute);
            prop_assert_eq!(parsed.col_absolute, col_absolute);
        }

        #[test]
        fn prop_large_columns_round_trip(col: u32) {
            let letters = Position::column_to_letters(col);
            prop_assert_eq!(Position::letters_to_column(&letters).unwrap(), col);
        }
    }
}
