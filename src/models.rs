//! Core data structures for order processing.
//!
//! Defines the parsed order record, courier and export format selectors,
//! the mapped table handed to exporters, and export statistics.

use crate::constants::{BLUEEX_COLUMNS, POSTEX_COLUMNS};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One customer order as extracted from a pasted text block.
///
/// Every field is optional: `None` means the key never appeared in the
/// block. A key that appeared with an empty value is `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Digits only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Courier-independent order reference ("ID:")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Digits only, from "Total:"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_type: Option<String>,
    /// From "Airway Bill Copy:"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awb_copies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderRecord {
    /// True when no field was populated
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Courier intake schema selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Courier {
    #[default]
    #[value(name = "postex")]
    PostEx,
    #[value(name = "blueex")]
    BlueEx,
}

impl Courier {
    /// Display name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            Courier::PostEx => "PostEx",
            Courier::BlueEx => "BlueEx",
        }
    }

    /// Lower-case name used in generated file names
    pub fn slug(&self) -> &'static str {
        match self {
            Courier::PostEx => "postex",
            Courier::BlueEx => "blueex",
        }
    }

    /// Column header for this courier, in upload order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Courier::PostEx => &POSTEX_COLUMNS,
            Courier::BlueEx => &BLUEEX_COLUMNS,
        }
    }
}

impl fmt::Display for Courier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Spreadsheet encoding for the export file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Legacy binary workbook (BIFF8), what the courier portals ask for
    #[default]
    Xls,
    /// Office Open XML workbook
    Xlsx,
    /// Comma-separated values
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xls => "xls",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One output row; its width always equals the courier's column count
pub type MappedRow = Vec<String>;

/// Header plus mapped rows for one courier, ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTable {
    pub courier: Courier,
    pub header: &'static [&'static str],
    pub rows: Vec<MappedRow>,
}

impl OrderTable {
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header followed by data rows, as string slices
    pub fn all_rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        std::iter::once(self.header.to_vec()).chain(
            self.rows
                .iter()
                .map(|row| row.iter().map(String::as_str).collect()),
        )
    }
}

/// Export statistics
#[derive(Debug, Default)]
pub struct ExportStats {
    pub orders_parsed: usize,
    /// Order blocks in which no known field was found
    pub blank_orders: usize,
    pub rows_written: usize,
    pub courier: Courier,
    pub format: ExportFormat,
    pub output_path: PathBuf,
    pub bytes_written: u64,
    pub processing_time_ms: u128,
}
