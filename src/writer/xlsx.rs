//! Office Open XML workbook (`.xlsx`) writer

use super::TableWriter;
use crate::error::Result;
use crate::models::{ExportFormat, OrderTable};
use rust_xlsxwriter::Workbook;

/// `.xlsx` encoder; empty cells are left unwritten
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    sheet_name: String,
}

impl XlsxWriter {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

impl TableWriter for XlsxWriter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn encode(&self, table: &OrderTable) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (row_idx, row) in table.all_rows().enumerate() {
            for (col_idx, text) in row.into_iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                worksheet.write_string(row_idx as u32, col_idx as u16, text)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}
