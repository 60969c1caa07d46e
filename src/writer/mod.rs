//! Spreadsheet writing for mapped order tables
//!
//! Each encoder turns an [`OrderTable`] (header row plus mapped rows, all
//! text) into file bytes. The processor only sees the [`TableWriter`] trait,
//! so the file format can change without touching parsing or mapping.

pub mod csv;
pub mod xls;
pub mod xlsx;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::models::{ExportFormat, OrderTable};
use std::fs;
use std::path::Path;
use tracing::debug;

pub use self::csv::{CsvTableWriter, table_to_dataframe};
pub use self::xls::XlsWriter;
pub use self::xlsx::XlsxWriter;

/// Encoder for one spreadsheet file format
pub trait TableWriter {
    /// Format produced by this writer
    fn format(&self) -> ExportFormat;

    /// Encode the whole table into file bytes
    fn encode(&self, table: &OrderTable) -> Result<Vec<u8>>;

    /// Encode and write to `path`, returning the number of bytes written
    fn write_to(&self, table: &OrderTable, path: &Path) -> Result<u64> {
        let bytes = self.encode(table)?;
        fs::write(path, &bytes)?;

        debug!(
            "Wrote {} rows as {} ({} bytes) to {}",
            table.len(),
            self.format(),
            bytes.len(),
            path.display()
        );

        Ok(bytes.len() as u64)
    }
}

/// Writer for the configured format
pub fn writer_for(config: &ExportConfig) -> Box<dyn TableWriter> {
    match config.format {
        ExportFormat::Xls => Box::new(XlsWriter::new(&config.sheet_name)),
        ExportFormat::Xlsx => Box::new(XlsxWriter::new(&config.sheet_name)),
        ExportFormat::Csv => Box::new(CsvTableWriter::new()),
    }
}
