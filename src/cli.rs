//! Command-line interface components.

use crate::config::{ExportConfig, default_output_dir};
use crate::constants::DEFAULT_SHEET_NAME;
use crate::models::{Courier, ExportFormat, ExportStats};
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "courier-orders")]
#[command(about = "Convert pasted WhatsApp orders into PostEx / BlueEx bulk booking spreadsheets")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// File containing pasted orders (reads stdin when omitted or "-")
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Courier schema for the export
    #[arg(short, long, value_enum, default_value_t = Courier::PostEx)]
    pub courier: Courier,

    /// Spreadsheet format to write
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Xls)]
    pub format: ExportFormat,

    /// Output file (overrides the generated {courier}_orders_{date} name)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for the generated file name (defaults to the Downloads folder)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Worksheet name
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    /// Overwrite the output file if it already exists
    #[arg(long)]
    pub force: bool,

    /// Print the mapped table instead of writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// Print parsed orders as JSON and exit
    #[arg(long)]
    pub emit_records: bool,

    /// Show the expected input format and exit
    #[arg(long)]
    pub show_format: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Export configuration described by these arguments
    pub fn to_config(&self) -> ExportConfig {
        let mut config = ExportConfig::default()
            .with_courier(self.courier)
            .with_format(self.format)
            .with_output_dir(
                self.output_dir
                    .clone()
                    .unwrap_or_else(default_output_dir),
            )
            .with_sheet_name(&self.sheet_name);

        if let Some(output) = &self.output {
            config = config.with_output_file(output);
        }
        if self.force {
            config = config.with_force_overwrite();
        }
        config
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Read the pasted order text from the input file or stdin
    pub fn read_input(&self) -> Result<String> {
        match self.input.as_deref() {
            Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read orders from {}", path.display())),
            _ => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("Failed to read orders from stdin")?;
                Ok(text)
            }
        }
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("courier_orders={}", args.log_level())));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(fmt::time::uptime())
                    .with_writer(io::stderr),
            )
            .init();
    }
}

/// Print the export summary
pub fn report_summary(stats: &ExportStats) {
    println!("{}", "Your export file is ready".bright_green().bold());
    println!(
        "  {} {}",
        "Courier:".bright_cyan(),
        stats.courier.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Orders:".bright_cyan(),
        stats.orders_parsed.to_string().bright_white().bold()
    );
    if stats.orders_parsed == 0 {
        println!(
            "  {}",
            "No order blocks found; the file only has a header row".bright_yellow()
        );
    }
    if stats.blank_orders > 0 {
        println!(
            "  {}",
            format!(
                "{} order blocks had no recognised fields; check those rows",
                stats.blank_orders
            )
            .bright_yellow()
        );
    }
    println!(
        "  {} {} ({} bytes)",
        "File:".bright_cyan(),
        stats.output_path.display().to_string().bright_white(),
        stats.bytes_written
    );
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms
    );
}

/// Print the warning shown when there is nothing to process
pub fn report_empty_input() {
    eprintln!(
        "{}",
        "Please paste some order data first.".bright_yellow().bold()
    );
    eprintln!("Run with --show-format to see the expected layout.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["courier-orders"]);
        assert_eq!(args.courier, Courier::PostEx);
        assert_eq!(args.format, ExportFormat::Xls);
        assert_eq!(args.sheet_name, "Orders");
        assert_eq!(args.log_level(), "warn");
        assert!(args.input.is_none());
    }

    /// Flags map onto the export configuration one-to-one
    #[test]
    fn test_to_config() {
        let args = Args::parse_from([
            "courier-orders",
            "orders.txt",
            "--courier",
            "blueex",
            "--format",
            "csv",
            "-d",
            "/tmp/out",
            "--force",
        ]);
        let config = args.to_config();

        assert_eq!(args.input, Some(PathBuf::from("orders.txt")));
        assert_eq!(config.courier, Courier::BlueEx);
        assert_eq!(config.format, ExportFormat::Csv);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.output_file.is_none());
        assert!(config.force_overwrite);
    }

    #[test]
    fn test_explicit_output() {
        let args = Args::parse_from(["courier-orders", "-o", "bookings.xls"]);
        assert_eq!(
            args.to_config().output_file,
            Some(PathBuf::from("bookings.xls"))
        );
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(Args::parse_from(["courier-orders", "-vv"]).log_level(), "debug");
        assert_eq!(Args::parse_from(["courier-orders", "-q"]).log_level(), "error");
        assert!(Args::try_parse_from(["courier-orders", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_unknown_courier_rejected() {
        assert!(Args::try_parse_from(["courier-orders", "--courier", "tcs"]).is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("orders.txt");
        std::fs::write(&path, "Name: Ali").unwrap();

        let args = Args::parse_from([std::ffi::OsStr::new("courier-orders"), path.as_os_str()]);
        assert_eq!(args.read_input().unwrap(), "Name: Ali");
    }
}
