//! Export pipeline.
//!
//! Runs one pasted-text submission through the whole flow: input
//! pre-condition check, parsing, courier mapping, file naming and encoding.
//! Every run is independent; nothing is kept between calls.

use crate::config::ExportConfig;
use crate::constants::{OUTPUT_DATE_FORMAT, OUTPUT_FILE_STEM};
use crate::error::{OrderError, Result};
use crate::models::{Courier, ExportFormat, ExportStats, OrderRecord, OrderTable};
use crate::parser::parse_orders;
use crate::schema::map_orders;
use crate::writer::{table_to_dataframe, writer_for};
use chrono::{Local, NaiveDate};
use polars::prelude::DataFrame;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Parse, map and export pasted order text
#[derive(Debug, Clone)]
pub struct OrderProcessor {
    config: ExportConfig,
}

impl OrderProcessor {
    /// Create a processor, rejecting invalid configuration up front
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Reject input with nothing but whitespace before any parsing happens
    pub fn validate_input(raw: &str) -> Result<()> {
        if raw.trim().is_empty() {
            warn!("Input is empty; nothing to process");
            return Err(OrderError::EmptyInput);
        }
        Ok(())
    }

    /// Parsed records for `raw`
    pub fn parse(&self, raw: &str) -> Result<Vec<OrderRecord>> {
        Self::validate_input(raw)?;

        let records = parse_orders(raw);
        if records.is_empty() {
            warn!("Input contained no order blocks");
        }

        let blank = blank_count(&records);
        if blank > 0 {
            warn!("{} order blocks had no recognised fields", blank);
        }
        Ok(records)
    }

    /// Parsed and mapped table for the configured courier
    pub fn build_table(&self, raw: &str) -> Result<OrderTable> {
        let records = self.parse(raw)?;
        Ok(map_orders(self.config.courier, &records))
    }

    /// Mapped table as a DataFrame, for display without writing a file
    pub fn preview(&self, raw: &str) -> Result<DataFrame> {
        let table = self.build_table(raw)?;
        table_to_dataframe(&table)
    }

    /// Where an export made on `date` is written
    pub fn output_path(&self, date: NaiveDate) -> PathBuf {
        match &self.config.output_file {
            Some(path) => path.clone(),
            None => self.config.output_dir.join(output_file_name(
                self.config.courier,
                self.config.format,
                date,
            )),
        }
    }

    /// Export using today's local date in the generated file name
    pub fn export(&self, raw: &str) -> Result<ExportStats> {
        self.export_on(raw, Local::now().date_naive())
    }

    /// Export with an explicit date for the generated file name
    pub fn export_on(&self, raw: &str, date: NaiveDate) -> Result<ExportStats> {
        let start_time = Instant::now();

        let records = self.parse(raw)?;
        let table = map_orders(self.config.courier, &records);

        let output_path = self.output_path(date);
        if output_path.exists() && !self.config.force_overwrite {
            return Err(OrderError::OutputExists { path: output_path });
        }
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let writer = writer_for(&self.config);
        debug!(
            "Writing {} {} rows to {}",
            table.len(),
            self.config.courier,
            output_path.display()
        );
        let bytes_written = writer.write_to(&table, &output_path)?;

        info!(
            "Exported {} orders for {} to {}",
            records.len(),
            self.config.courier,
            output_path.display()
        );

        Ok(ExportStats {
            orders_parsed: records.len(),
            blank_orders: blank_count(&records),
            rows_written: table.len(),
            courier: self.config.courier,
            format: self.config.format,
            output_path,
            bytes_written,
            processing_time_ms: start_time.elapsed().as_millis(),
        })
    }
}

/// Records with no populated field
pub fn blank_count(records: &[OrderRecord]) -> usize {
    records.iter().filter(|record| record.is_empty()).count()
}

/// `{courier}_orders_{YYYYMMDD}.{ext}`
pub fn output_file_name(courier: Courier, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.{}",
        courier.slug(),
        OUTPUT_FILE_STEM,
        date.format(OUTPUT_DATE_FORMAT),
        format.extension()
    )
}
