//! Pasted order text parsing.
//!
//! Splits messaging-app text into order blocks on the package marker and
//! extracts `Key: value` lines into [`OrderRecord`] fields. Parsing is
//! permissive: lines without a colon and unknown keys are skipped, and
//! there is no error path.

use crate::constants::{FIELD_DELIMITER, ORDER_SENTINEL};
use crate::models::OrderRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace};

static NON_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^0-9]").expect("static pattern is valid"));

/// Record field addressed by a line key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Name,
    Phone,
    City,
    Address,
    ExternalId,
    Amount,
    Items,
    OrderType,
    AwbCopies,
    Note,
}

/// Lower-cased line key to field
const FIELD_KEYS: &[(&str, OrderField)] = &[
    ("name", OrderField::Name),
    ("phone", OrderField::Phone),
    ("city", OrderField::City),
    ("address", OrderField::Address),
    ("id", OrderField::ExternalId),
    ("total", OrderField::Amount),
    ("items", OrderField::Items),
    ("order type", OrderField::OrderType),
    ("airway bill copy", OrderField::AwbCopies),
    ("note", OrderField::Note),
];

impl OrderField {
    /// Look up a field by its trimmed, lower-cased key
    pub fn from_key(key: &str) -> Option<Self> {
        FIELD_KEYS
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, field)| *field)
    }

    /// Whether the raw value is reduced to ASCII digits before storing
    pub fn digits_only(&self) -> bool {
        matches!(self, OrderField::Phone | OrderField::Amount)
    }

    /// Store `value` in the record, replacing any earlier value for this field
    pub fn apply(&self, record: &mut OrderRecord, value: &str) {
        let value = if self.digits_only() {
            digits_only(value)
        } else {
            value.to_string()
        };

        let slot = match self {
            OrderField::Name => &mut record.name,
            OrderField::Phone => &mut record.phone,
            OrderField::City => &mut record.city,
            OrderField::Address => &mut record.address,
            OrderField::ExternalId => &mut record.external_id,
            OrderField::Amount => &mut record.amount,
            OrderField::Items => &mut record.items,
            OrderField::OrderType => &mut record.order_type,
            OrderField::AwbCopies => &mut record.awb_copies,
            OrderField::Note => &mut record.note,
        };
        *slot = Some(value);
    }
}

/// Parse every order block in `raw` into a record, preserving input order
pub fn parse_orders(raw: &str) -> Vec<OrderRecord> {
    let records: Vec<OrderRecord> = split_blocks(raw).into_iter().map(parse_block).collect();
    debug!("Parsed {} order blocks", records.len());
    records
}

/// Split text on the order marker, dropping blocks with no visible content.
///
/// Text ahead of the first marker counts as a block, so a paste that forgot
/// the marker still yields one order.
pub fn split_blocks(raw: &str) -> Vec<&str> {
    raw.trim()
        .split(ORDER_SENTINEL)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Extract the known `Key: value` lines of a single block
pub fn parse_block(block: &str) -> OrderRecord {
    let mut record = OrderRecord::default();

    for line in block.split(is_line_break) {
        let Some((key, value)) = split_field_line(line) else {
            continue;
        };

        match OrderField::from_key(&key) {
            Some(field) => field.apply(&mut record, value),
            None => trace!("Ignoring unknown key: {}", key),
        }
    }

    record
}

/// Line separators recognised inside a block.
///
/// Covers CR and LF (so `\r\n` leaves an empty line that is skipped), the
/// vertical tab, form feed, file/group/record separators, NEL and the
/// Unicode line and paragraph separators that chat apps sometimes emit.
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{1C}'
            | '\u{1D}'
            | '\u{1E}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split a line on its first colon into a lower-cased key and trimmed value
fn split_field_line(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(FIELD_DELIMITER)?;
    Some((key.trim().to_lowercase(), value.trim()))
}

/// Remove every character that is not an ASCII digit
pub fn digits_only(value: &str) -> String {
    NON_DIGITS.replace_all(value, "").into_owned()
}
