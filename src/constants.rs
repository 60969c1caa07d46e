//! Application constants for the courier order exporter
//!
//! This module contains the input markers, courier column schemas, default
//! cell values and file naming pieces used throughout the crate.

// =============================================================================
// Input Format
// =============================================================================

/// Marker that starts every order block in pasted text (U+1F4E6, package emoji)
pub const ORDER_SENTINEL: char = '\u{1F4E6}';

/// Separator between a field key and its value; only the first one counts
pub const FIELD_DELIMITER: char = ':';

/// Example shown by `--show-format`
pub const INPUT_FORMAT_EXAMPLE: &str = "\
\u{1F4E6} Name: Rehmat Ullah
Phone: 03321730623
City: Dera Ismail Khan
Address: Eid Gha Kalan, Masjid Alsudes
ID: LIL11786
Total: 1700
Items: 3
Order Type: Normal
Airway Bill Copy: 1
Note: Call before delivery";

// =============================================================================
// Mapper Defaults
// =============================================================================

/// Standard note appended to the Notes / Customer Comment columns of every row
pub const STANDARD_NOTE: &str =
    "kids clothes - If the number is unavailable, please reach out via WhatsApp";

/// Joins a per-order note to the standard note
pub const NOTE_SEPARATOR: &str = " \u{2014} ";

/// Fallback values for optional order fields
pub mod defaults {
    pub const AMOUNT: &str = "0";
    pub const ITEMS: &str = "1";
    pub const AIRWAY_BILL_COPIES: &str = "1";
    pub const ORDER_TYPE: &str = "Normal";

    /// Every parcel is booked at the same weight (kg)
    pub const BOOKING_WEIGHT: &str = "0.5";

    /// BlueEx product category; the exporter only ships one kind of goods
    pub const PRODUCT_NAME: &str = "Kids Clothes";
}

// =============================================================================
// Courier Column Schemas
// =============================================================================

/// PostEx bulk booking columns, in upload order
pub const POSTEX_COLUMNS: [&str; 14] = [
    "Order Reference Number",
    "Order Amount",
    "Order Detail",
    "Customer Name",
    "Customer Phone",
    "Order Address",
    "City",
    "Items",
    "Airway Bill Copies",
    "Notes",
    "Address Code",
    "Return Address Code",
    "Order Type (Normal/Reversed/Replacement/Overland)",
    "Booking Weight",
];

/// BlueEx bulk booking columns, in upload order
pub const BLUEEX_COLUMNS: [&str; 12] = [
    "Consignee Name",
    "Consignee Address",
    "Consignee Contact No",
    "Consignee Email",
    "Product Name",
    "COD",
    "Pieces",
    "Weight",
    "Destination",
    "Customer Reference",
    "Customer Comment",
    "Store Id",
];

// =============================================================================
// Output
// =============================================================================

/// Worksheet name expected by both courier portals
pub const DEFAULT_SHEET_NAME: &str = "Orders";

/// Excel's limit on worksheet name length
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters Excel rejects in worksheet names
pub const INVALID_SHEET_NAME_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// File name stem between the courier slug and the date
pub const OUTPUT_FILE_STEM: &str = "orders";

/// Date format used in generated file names
pub const OUTPUT_DATE_FORMAT: &str = "%Y%m%d";

/// Exit code used when there is nothing to process
pub const EXIT_EMPTY_INPUT: i32 = 2;
