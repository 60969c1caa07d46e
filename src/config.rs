//! Configuration management and validation.
//!
//! Holds the export settings chosen on the command line: courier schema,
//! file format, output location and worksheet name.

use crate::constants::{DEFAULT_SHEET_NAME, INVALID_SHEET_NAME_CHARS, MAX_SHEET_NAME_LEN};
use crate::error::{OrderError, Result};
use crate::models::{Courier, ExportFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings for one export run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Courier schema to map orders into
    pub courier: Courier,

    /// Spreadsheet encoding of the output file
    pub format: ExportFormat,

    /// Directory for generated file names
    pub output_dir: PathBuf,

    /// Explicit output file; overrides `output_dir` and the generated name
    pub output_file: Option<PathBuf>,

    /// Name of the single worksheet
    pub sheet_name: String,

    /// Replace an existing output file
    pub force_overwrite: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            courier: Courier::default(),
            format: ExportFormat::default(),
            output_dir: default_output_dir(),
            output_file: None,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            force_overwrite: false,
        }
    }
}

/// The user's download directory, or the working directory when there is none
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl ExportConfig {
    pub fn with_courier(mut self, courier: Courier) -> Self {
        self.courier = courier;
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = Some(output_file.into());
        self
    }

    pub fn with_sheet_name(mut self, sheet_name: impl Into<String>) -> Self {
        self.sheet_name = sheet_name.into();
        self
    }

    /// Allow replacing an existing output file
    pub fn with_force_overwrite(mut self) -> Self {
        self.force_overwrite = true;
        self
    }

    /// Check settings that the encoders would otherwise reject mid-write
    pub fn validate(&self) -> Result<()> {
        validate_sheet_name(&self.sheet_name)?;

        if let Some(path) = &self.output_file {
            if path.as_os_str().is_empty() {
                return Err(OrderError::Configuration {
                    message: "Output file path is empty".to_string(),
                });
            }
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

/// Worksheet names must be 1-31 characters and avoid `[]:*?/\`
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| OrderError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid(&format!(
            "must be at most {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(invalid(&format!("contains '{c}'")));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid("must not start or end with an apostrophe"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.courier, Courier::PostEx);
        assert_eq!(config.format, ExportFormat::Xls);
        assert_eq!(config.sheet_name, "Orders");
        assert!(config.output_file.is_none());
        assert!(!config.force_overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ExportConfig::default()
            .with_courier(Courier::BlueEx)
            .with_format(ExportFormat::Csv)
            .with_output_dir("/tmp/out")
            .with_sheet_name("Bookings")
            .with_force_overwrite();

        assert_eq!(config.courier, Courier::BlueEx);
        assert_eq!(config.format, ExportFormat::Csv);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.sheet_name, "Bookings");
        assert!(config.force_overwrite);
    }

    /// Purpose: Validate the workbook sheet-name limits (length, forbidden characters)
    /// Benefit: Bad names fail at configuration time rather than halfway through a write
    #[test]
    fn test_sheet_name_rules() {
        assert!(validate_sheet_name("Orders").is_ok());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name("Orders/May").is_err());
        assert!(validate_sheet_name("'Orders").is_err());
    }

    #[test]
    fn test_empty_output_file_rejected() {
        let config = ExportConfig::default().with_output_file("");
        assert!(matches!(
            config.validate(),
            Err(OrderError::Configuration { .. })
        ));
    }

    #[test]
    fn test_serde_names() {
        let config = ExportConfig::default().with_courier(Courier::BlueEx);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["courier"], "blueex");
        assert_eq!(json["format"], "xls");
    }
}
