//! CSV writer backed by a Polars DataFrame

use super::TableWriter;
use crate::error::Result;
use crate::models::{ExportFormat, OrderTable};
use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};

/// `.csv` encoder
#[derive(Debug, Clone, Default)]
pub struct CsvTableWriter;

impl CsvTableWriter {
    pub fn new() -> Self {
        Self
    }
}

impl TableWriter for CsvTableWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn encode(&self, table: &OrderTable) -> Result<Vec<u8>> {
        let mut df = table_to_dataframe(table)?;
        let mut buffer = Vec::new();

        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(&mut df)?;

        Ok(buffer)
    }
}

/// One String column per header entry, in schema order
pub fn table_to_dataframe(table: &OrderTable) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<&str> = table.rows.iter().map(|row| row[idx].as_str()).collect();
            Column::new((*name).into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}
