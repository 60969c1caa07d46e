//! Courier Orders Library
//!
//! Converts order records pasted from a messaging app into bulk booking
//! spreadsheets for the PostEx and BlueEx courier portals.
//!
//! This library provides tools for:
//! - Splitting pasted text into order blocks and extracting `Key: value` fields
//! - Mapping parsed orders onto each courier's fixed column layout
//! - Writing the result as a legacy `.xls` workbook, an `.xlsx` workbook or CSV
//!
//! ```
//! use courier_orders::{Courier, map_orders, parse_orders};
//!
//! let records = parse_orders("\u{1F4E6} Name: Ali\nPhone: 0300-1234567\nTotal: 1,200");
//! let table = map_orders(Courier::BlueEx, &records);
//! assert_eq!(table.rows[0][2], "03001234567");
//! assert_eq!(table.rows[0][5], "1200");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod schema;
pub mod writer;

pub use config::ExportConfig;
pub use error::{OrderError, Result};
pub use models::{Courier, ExportFormat, ExportStats, MappedRow, OrderRecord, OrderTable};
pub use parser::parse_orders;
pub use processor::OrderProcessor;
pub use schema::{map_orders, to_blueex, to_postex};
pub use writer::TableWriter;
