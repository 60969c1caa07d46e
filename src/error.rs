//! Error handling for order export operations.
//!
//! Parsing and mapping never fail; these errors come from the input
//! pre-condition check, configuration, and the file encoders.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No order data provided")]
    EmptyInput,

    #[error("Output file already exists: {path} (use --force to overwrite)")]
    OutputExists { path: PathBuf },

    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    #[error("Too many rows for {format} export: {rows} (limit {limit})")]
    TooManyRows {
        format: String,
        rows: usize,
        limit: usize,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl OrderError {
    /// Whether this error is the "nothing to process" pre-condition rather than a failure
    pub fn is_empty_input(&self) -> bool {
        matches!(self, OrderError::EmptyInput)
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
