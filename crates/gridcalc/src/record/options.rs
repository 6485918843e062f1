//! Record stream options

/// Options for reading and writing record streams
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordOptions {
    /// Byte that terminates every field (default: `|`)
    pub separator: u8,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self { separator: b'|' }
    }
}
