//! Cell value type and its operator algebra
//!
//! Every operation is total: operand combinations that make no sense
//! (adding to an empty cell, dividing by zero, comparing text with a number)
//! produce [`ContentValue::Absent`] instead of an error.

use std::cmp::Ordering;
use std::fmt;

/// The value a cell evaluates to
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentValue {
    /// No value (empty cell, or the result of an invalid operation)
    #[default]
    Absent,
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

/// Placeholder printed for [`ContentValue::Absent`]. It never appears in
/// persisted formulas.
const ABSENT_TOKEN: &str = "<absent>";

impl ContentValue {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        ContentValue::Text(s.into())
    }

    /// Check if the value is absent
    pub fn is_absent(&self) -> bool {
        matches!(self, ContentValue::Absent)
    }

    /// Get the number, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ContentValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text, if this is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            ContentValue::Absent => "absent",
            ContentValue::Number(_) => "number",
            ContentValue::Text(_) => "text",
        }
    }

    // === Arithmetic ===

    /// `+`: sums numbers and concatenates text. A number next to text is
    /// rendered with six decimals before concatenation.
    pub fn plus(&self, rhs: &ContentValue) -> ContentValue {
        match (self, rhs) {
            (ContentValue::Number(a), ContentValue::Number(b)) => ContentValue::Number(a + b),
            (ContentValue::Text(a), ContentValue::Text(b)) => {
                ContentValue::Text(format!("{}{}", a, b))
            }
            (ContentValue::Text(a), ContentValue::Number(b)) => {
                ContentValue::Text(format!("{}{}", a, concat_number(*b)))
            }
            (ContentValue::Number(a), ContentValue::Text(b)) => {
                ContentValue::Text(format!("{}{}", concat_number(*a), b))
            }
            _ => ContentValue::Absent,
        }
    }

    /// `-`: `self + (-rhs)`, numbers only
    pub fn minus(&self, rhs: &ContentValue) -> ContentValue {
        match (self, rhs) {
            (ContentValue::Number(_), ContentValue::Number(_)) => self.plus(&rhs.negate()),
            _ => ContentValue::Absent,
        }
    }

    /// `*`, numbers only
    pub fn times(&self, rhs: &ContentValue) -> ContentValue {
        match (self, rhs) {
            (ContentValue::Number(a), ContentValue::Number(b)) => ContentValue::Number(a * b),
            _ => ContentValue::Absent,
        }
    }

    /// `/`, numbers only; a zero divisor yields absent
    pub fn divide(&self, rhs: &ContentValue) -> ContentValue {
        match (self, rhs) {
            (ContentValue::Number(_), ContentValue::Number(b)) if *b == 0.0 => {
                ContentValue::Absent
            }
            (ContentValue::Number(a), ContentValue::Number(b)) => ContentValue::Number(a / b),
            _ => ContentValue::Absent,
        }
    }

    /// `^`, numbers only
    pub fn power(&self, rhs: &ContentValue) -> ContentValue {
        match (self, rhs) {
            (ContentValue::Number(a), ContentValue::Number(b)) => ContentValue::Number(a.powf(*b)),
            _ => ContentValue::Absent,
        }
    }

    /// Unary `-`, numbers only
    pub fn negate(&self) -> ContentValue {
        match self {
            ContentValue::Number(n) => ContentValue::Number(-n),
            _ => ContentValue::Absent,
        }
    }

    // === Comparison ===

    /// Three-way comparison of two numbers or two texts.
    ///
    /// Texts compare lexicographically by bytes. A NaN on either side makes
    /// the left operand compare as greater. Mixed or absent operands have no
    /// ordering.
    pub fn compare(&self, rhs: &ContentValue) -> Option<Ordering> {
        match (self, rhs) {
            (ContentValue::Number(a), ContentValue::Number(b)) => {
                Some(a.partial_cmp(b).unwrap_or(Ordering::Greater))
            }
            (ContentValue::Text(a), ContentValue::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            _ => None,
        }
    }

    /// `<`
    pub fn less_than(&self, rhs: &ContentValue) -> ContentValue {
        self.compare_with(rhs, Ordering::is_lt)
    }

    /// `>`
    pub fn greater_than(&self, rhs: &ContentValue) -> ContentValue {
        self.compare_with(rhs, Ordering::is_gt)
    }

    /// `<=`
    pub fn less_equal(&self, rhs: &ContentValue) -> ContentValue {
        self.compare_with(rhs, Ordering::is_le)
    }

    /// `>=`
    pub fn greater_equal(&self, rhs: &ContentValue) -> ContentValue {
        self.compare_with(rhs, Ordering::is_ge)
    }

    /// `==`
    pub fn equal(&self, rhs: &ContentValue) -> ContentValue {
        self.compare_with(rhs, Ordering::is_eq)
    }

    /// `!=`
    pub fn not_equal(&self, rhs: &ContentValue) -> ContentValue {
        self.compare_with(rhs, Ordering::is_ne)
    }

    fn compare_with(&self, rhs: &ContentValue, test: fn(Ordering) -> bool) -> ContentValue {
        match self.compare(rhs) {
            Some(ord) => ContentValue::from(test(ord)),
            None => ContentValue::Absent,
        }
    }
}

/// Text form of a number inside a concatenation
fn concat_number(n: f64) -> String {
    format!("{:.6}", n)
}

impl From<f64> for ContentValue {
    fn from(n: f64) -> Self {
        ContentValue::Number(n)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Number(if b { 1.0 } else { 0.0 })
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Text(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

/// Canonical rendering: numbers in default float form, text as a
/// double-quoted literal with embedded quotes doubled.
impl fmt::Display for ContentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentValue::Absent => f.write_str(ABSENT_TOKEN),
            ContentValue::Number(n) => write!(f, "{}", n),
            ContentValue::Text(s) => {
                f.write_str("\"")?;
                f.write_str(&s.replace('"', "\"\""))?;
                f.write_str("\"")
            }
        }
    }
}
