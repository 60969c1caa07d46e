//! Courier schema mapping.
//!
//! Projects parsed [`OrderRecord`]s onto the fixed PostEx and BlueEx bulk
//! booking layouts. Both mappers are pure and total: a record with no fields
//! still produces a full-width row of defaults.

use crate::constants::{NOTE_SEPARATOR, STANDARD_NOTE, defaults};
use crate::models::{Courier, MappedRow, OrderRecord, OrderTable};
use tracing::debug;

/// Map records for `courier` and attach the matching header
pub fn map_orders(courier: Courier, records: &[OrderRecord]) -> OrderTable {
    let rows = match courier {
        Courier::PostEx => to_postex(records),
        Courier::BlueEx => to_blueex(records),
    };

    debug!("Mapped {} orders to {} rows", records.len(), courier);

    OrderTable {
        courier,
        header: courier.columns(),
        rows,
    }
}

/// PostEx layout, 14 columns
pub fn to_postex(records: &[OrderRecord]) -> Vec<MappedRow> {
    records
        .iter()
        .map(|order| {
            vec![
                or_empty(&order.external_id),
                or_default(&order.amount, defaults::AMOUNT),
                STANDARD_NOTE.to_string(),
                or_empty(&order.name),
                or_empty(&order.phone),
                or_empty(&order.address),
                or_empty(&order.city),
                or_default(&order.items, defaults::ITEMS),
                or_default(&order.awb_copies, defaults::AIRWAY_BILL_COPIES),
                compose_note(order.note.as_deref()),
                // Address Code, Return Address Code
                String::new(),
                String::new(),
                or_default(&order.order_type, defaults::ORDER_TYPE),
                defaults::BOOKING_WEIGHT.to_string(),
            ]
        })
        .collect()
}

/// BlueEx layout, 12 columns
pub fn to_blueex(records: &[OrderRecord]) -> Vec<MappedRow> {
    records
        .iter()
        .map(|order| {
            vec![
                or_empty(&order.name),
                or_empty(&order.address),
                or_empty(&order.phone),
                // Consignee Email is never collected
                String::new(),
                defaults::PRODUCT_NAME.to_string(),
                or_default(&order.amount, defaults::AMOUNT),
                or_default(&order.items, defaults::ITEMS),
                defaults::BOOKING_WEIGHT.to_string(),
                or_empty(&order.city),
                or_empty(&order.external_id),
                compose_note(order.note.as_deref()),
                // Store Id
                String::new(),
            ]
        })
        .collect()
}

/// Prefix the standard note with the order's own note, if it has one
pub fn compose_note(note: Option<&str>) -> String {
    match note {
        Some(note) if !note.is_empty() => format!("{note}{NOTE_SEPARATOR}{STANDARD_NOTE}"),
        _ => STANDARD_NOTE.to_string(),
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

fn or_empty(value: &Option<String>) -> String {
    or_default(value, "")
}
