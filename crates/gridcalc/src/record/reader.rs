//! Record reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::RecordOptions;
use crate::table::Table;
use ahash::AHashMap;
use gridcalc_core::Position;
use gridcalc_formula::{parse_formula, Expr};

/// Record stream reader
pub struct RecordReader;

impl RecordReader {
    /// Load a table from a file
    pub fn read_file<P: AsRef<Path>>(
        table: &mut Table,
        path: P,
        options: &RecordOptions,
    ) -> Result<()> {
        table.clear();
        let file = File::open(path)?;
        Self::read(table, file, options)
    }

    /// Replace the contents of `table` with the cells in `reader`
    ///
    /// The table is cleared first. Cells are committed only once the whole
    /// stream has been read, so on any error the table is left empty.
    pub fn read<R: Read>(table: &mut Table, mut reader: R, options: &RecordOptions) -> Result<()> {
        table.clear();

        let mut data = Vec::new();
        let result = reader
            .read_to_end(&mut data)
            .map_err(Error::from)
            .and_then(|_| parse_cells(&data, options.separator));

        match result {
            Ok(cells) => {
                log::debug!("loaded {} cells", cells.len());
                table.replace_cells(cells);
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to load table: {}", e);
                Err(e)
            }
        }
    }
}

fn parse_cells(data: &[u8], sep: u8) -> Result<AHashMap<Position, Expr>> {
    let mut offset = 0;
    let count = read_length(data, &mut offset, sep)?;

    let mut cells = AHashMap::new();
    for index in 0..count {
        let pos_text = read_field(data, &mut offset, sep)?;
        let pos = Position::parse(pos_text)?;

        let formula = read_field(data, &mut offset, sep)?;
        if !formula.starts_with('=') {
            return Err(Error::stream(format!(
                "cell {} of {} ({}): formula text must start with '='",
                index + 1,
                count,
                pos
            )));
        }
        let expr = parse_formula(formula)?;

        cells.insert(pos.relative(), expr);
    }

    if offset != data.len() {
        return Err(Error::stream(format!(
            "{} trailing bytes after the last cell",
            data.len() - offset
        )));
    }

    Ok(cells)
}

/// Read decimal digits terminated by `sep`, advancing `offset`
fn read_length(data: &[u8], offset: &mut usize, sep: u8) -> Result<usize> {
    let start = *offset;
    while *offset < data.len() && data[*offset].is_ascii_digit() {
        *offset += 1;
    }
    if *offset == start {
        return Err(Error::stream(format!("expected a length at offset {}", start)));
    }

    let digits = std::str::from_utf8(&data[start..*offset])
        .map_err(|_| Error::stream(format!("invalid length at offset {}", start)))?;
    let length = digits
        .parse::<usize>()
        .map_err(|_| Error::stream(format!("length out of range at offset {}", start)))?;

    expect_separator(data, offset, sep)?;
    Ok(length)
}

/// Read a length-prefixed, separator-terminated UTF-8 field, advancing `offset`
fn read_field<'a>(data: &'a [u8], offset: &mut usize, sep: u8) -> Result<&'a str> {
    let length = read_length(data, offset, sep)?;
    let start = *offset;
    if data.len() - start < length {
        return Err(Error::stream(format!(
            "unexpected end of data at offset {}, need {} bytes",
            start, length
        )));
    }
    *offset += length;

    let text = std::str::from_utf8(&data[start..*offset])
        .map_err(|_| Error::stream(format!("field at offset {} is not valid UTF-8", start)))?;
    expect_separator(data, offset, sep)?;
    Ok(text)
}

fn expect_separator(data: &[u8], offset: &mut usize, sep: u8) -> Result<()> {
    match data.get(*offset) {
        Some(&b) if b == sep => {
            *offset += 1;
            Ok(())
        }
        Some(&b) => Err(Error::stream(format!(
            "expected separator '{}' at offset {}, found '{}'",
            sep as char, *offset, b as char
        ))),
        None => Err(Error::stream(format!(
            "unexpected end of data at offset {}, expected separator",
            *offset
        ))),
    }
}
