//! End-to-end tests for the parse → map → export pipeline
//!
//! These tests run pasted order text through the public API and check the
//! files that land on disk.

use chrono::NaiveDate;
use courier_orders::constants::{BLUEEX_COLUMNS, POSTEX_COLUMNS, STANDARD_NOTE};
use courier_orders::{
    Courier, ExportConfig, ExportFormat, OrderError, OrderProcessor, map_orders, parse_orders,
};
use std::fs;
use std::io::{Cursor, Read};
use tempfile::TempDir;

const REHMAT: &str = "\u{1F4E6} Name: Rehmat Ullah\nPhone: 0332-1730623\nCity: DIK\nAddress: Street 1\nID: LIL1\nTotal: 1,700\nItems: 3\nOrder Type: Normal\nAirway Bill Copy: 1\nNote: Call first";

const WHATSAPP_PASTE: &str = "\
\u{1F4E6} Name: Ayesha Khan
Phone: +92 300 1234567
City: Lahore
Address: House 12, Block C: Johar Town
ID: LIL200
Total: Rs 2,450
Items: 2

\u{1F4E6} Name: Bilal
Phone: 0345-7654321
City: Multan
ID: LIL201
Order Type: Replacement
Note: Deliver after 5pm

\u{1F4E6}
";

fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
}

fn composed(note: &str) -> String {
    format!("{note} \u{2014} {STANDARD_NOTE}")
}

/// Test the reference order against the PostEx intake layout
///
/// Purpose: Validate every one of the 14 PostEx columns for a fully populated order
/// Benefit: Catches column order or default drift before a bulk upload is rejected by the portal
#[test]
fn test_reference_order_postex_row() {
    let table = map_orders(Courier::PostEx, &parse_orders(REHMAT));
    assert_eq!(table.header, &POSTEX_COLUMNS[..]);
    assert_eq!(
        table.rows,
        vec![vec![
            "LIL1".to_string(),
            "1700".to_string(),
            STANDARD_NOTE.to_string(),
            "Rehmat Ullah".to_string(),
            "03321730623".to_string(),
            "Street 1".to_string(),
            "DIK".to_string(),
            "3".to_string(),
            "1".to_string(),
            composed("Call first"),
            String::new(),
            String::new(),
            "Normal".to_string(),
            "0.5".to_string(),
        ]]
    );
}

/// Test the reference order against the BlueEx intake layout
#[test]
fn test_reference_order_blueex_row() {
    let table = map_orders(Courier::BlueEx, &parse_orders(REHMAT));
    assert_eq!(table.header, &BLUEEX_COLUMNS[..]);
    assert_eq!(
        table.rows[0],
        vec![
            "Rehmat Ullah".to_string(),
            "Street 1".to_string(),
            "03321730623".to_string(),
            String::new(),
            "Kids Clothes".to_string(),
            "1700".to_string(),
            "3".to_string(),
            "0.5".to_string(),
            "DIK".to_string(),
            "LIL1".to_string(),
            composed("Call first"),
            String::new(),
        ]
    );
}

/// Test a realistic multi-order paste with blank lines and a trailing marker
///
/// Purpose: Validate block splitting, digit filtering and per-field defaults together
/// Benefit: Ensures partially filled orders still map to complete rows
#[test]
fn test_multi_order_paste() {
    let records = parse_orders(WHATSAPP_PASTE);
    assert_eq!(records.len(), 2);

    let table = map_orders(Courier::PostEx, &records);
    let first = &table.rows[0];
    assert_eq!(first[0], "LIL200");
    assert_eq!(first[1], "2450");
    assert_eq!(first[4], "923001234567");
    assert_eq!(first[5], "House 12, Block C: Johar Town");
    assert_eq!(first[9], STANDARD_NOTE);
    assert_eq!(first[12], "Normal");

    let second = &table.rows[1];
    assert_eq!(second[1], "0");
    assert_eq!(second[5], "");
    assert_eq!(second[7], "1");
    assert_eq!(second[9], composed("Deliver after 5pm"));
    assert_eq!(second[12], "Replacement");
}

/// Test that every output format lands on disk under the generated file name
#[test]
fn test_export_every_format() {
    let temp_dir = TempDir::new().unwrap();

    for format in [ExportFormat::Xls, ExportFormat::Xlsx, ExportFormat::Csv] {
        let config = ExportConfig::default()
            .with_courier(Courier::BlueEx)
            .with_format(format)
            .with_output_dir(temp_dir.path());
        let stats = OrderProcessor::new(config)
            .unwrap()
            .export_on(WHATSAPP_PASTE, export_date())
            .unwrap();

        let expected = temp_dir
            .path()
            .join(format!("blueex_orders_20250309.{}", format.extension()));
        assert_eq!(stats.output_path, expected);
        assert_eq!(stats.orders_parsed, 2);
        assert_eq!(stats.format, format);
        assert!(fs::metadata(&expected).unwrap().len() > 0);
    }
}

/// Test the `.xls` output container
///
/// Purpose: Validate the OLE2 signature and the BIFF8 BOF record inside `/Workbook`
/// Benefit: Ensures spreadsheet tools recognise the file as a legacy workbook
#[test]
fn test_xls_export_is_compound_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("orders.xls");
    let config = ExportConfig::default().with_output_file(&path);

    OrderProcessor::new(config)
        .unwrap()
        .export_on(REHMAT, export_date())
        .unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]));

    let mut compound = cfb::CompoundFile::open(Cursor::new(bytes)).unwrap();
    let mut workbook = Vec::new();
    compound
        .open_stream("/Workbook")
        .unwrap()
        .read_to_end(&mut workbook)
        .unwrap();

    // BOF record for BIFF8 workbook globals
    assert_eq!(&workbook[..8], &[0x09, 0x08, 0x10, 0x00, 0x00, 0x06, 0x05, 0x00]);
}

#[test]
fn test_csv_export_contents() {
    let temp_dir = TempDir::new().unwrap();
    let config = ExportConfig::default()
        .with_format(ExportFormat::Csv)
        .with_output_dir(temp_dir.path());

    let stats = OrderProcessor::new(config)
        .unwrap()
        .export_on(REHMAT, export_date())
        .unwrap();

    let text = fs::read_to_string(stats.output_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], POSTEX_COLUMNS.join(","));
    assert!(lines[1].starts_with("LIL1,1700,"));
    assert!(lines[1].contains("Call first \u{2014} kids clothes"));
}

/// Test that whitespace-only input is refused without creating any file
#[test]
fn test_empty_input_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let config = ExportConfig::default().with_output_dir(temp_dir.path());
    let processor = OrderProcessor::new(config).unwrap();

    let error = processor.export_on("  \n ", export_date()).unwrap_err();
    assert!(matches!(error, OrderError::EmptyInput));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

/// Test input that has markers but no order content
///
/// Purpose: Validate the difference between empty input and input with no order blocks
/// Benefit: Ensures the header-only file is still produced instead of an error
#[test]
fn test_markers_only_exports_header() {
    let temp_dir = TempDir::new().unwrap();
    let config = ExportConfig::default()
        .with_format(ExportFormat::Csv)
        .with_output_dir(temp_dir.path());

    let stats = OrderProcessor::new(config)
        .unwrap()
        .export_on("\u{1F4E6}\n\u{1F4E6}", export_date())
        .unwrap();

    assert_eq!(stats.orders_parsed, 0);
    let text = fs::read_to_string(stats.output_path).unwrap();
    assert_eq!(text.lines().count(), 1);
}
