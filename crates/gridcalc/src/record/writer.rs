//! Record writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::record::RecordOptions;
use crate::table::Table;
use gridcalc_formula::Expr;

/// Record stream writer
pub struct RecordWriter;

impl RecordWriter {
    /// Write a table to a file, replacing its contents
    pub fn write_file<P: AsRef<Path>>(
        table: &Table,
        path: P,
        options: &RecordOptions,
    ) -> Result<()> {
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write a table to a writer
    ///
    /// Cells are written in row-major order. Cells holding the absent
    /// literal are equivalent to no entry and are left out.
    pub fn write<W: Write>(table: &Table, writer: W, options: &RecordOptions) -> Result<()> {
        let mut out = BufWriter::new(writer);
        let sep = options.separator;

        let cells: Vec<_> = table
            .iter()
            .filter(|(_, expr)| *expr != Expr::absent())
            .collect();

        write!(out, "{}", cells.len())?;
        out.write_all(&[sep])?;

        for (pos, expr) in cells {
            write_field(&mut out, &pos.to_string(), sep)?;
            write_field(&mut out, &format!("={}", expr), sep)?;
        }

        out.flush()?;
        Ok(())
    }
}

fn write_field<W: Write>(out: &mut W, text: &str, sep: u8) -> Result<()> {
    write!(out, "{}", text.len())?;
    out.write_all(&[sep])?;
    out.write_all(text.as_bytes())?;
    out.write_all(&[sep])?;
    Ok(())
}
