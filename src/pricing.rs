// Pricing and availability over Pricing tab records
//
// Every operation scans all records, keeps those whose Date falls inside the
// stay and skips rows that cannot be read, logging each skipped row.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::dates::{cell_text, parse_sheet_date, StayRange};
use crate::fallback::{self, DELUXE, STANDARD, SUITE};
use crate::models::{
    PriceQuote, PriceRequest, Record, COL_AVAILABLE_ROOMS, COL_DATE, COL_DOUBLE_RATE,
    COL_EXTRA_PERSON, COL_ROOM_TYPE, COL_SINGLE_RATE, COL_WITH_BREAKFAST,
};

const DEFAULT_SINGLE_RATE: f64 = 100.0;
const DEFAULT_DOUBLE_RATE: f64 = 150.0;

/// Fix the spellings staff actually type into the sheet.
pub fn normalize_room_type(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "delux" => DELUXE.to_string(),
        "standard" => STANDARD.to_string(),
        "suite" => SUITE.to_string(),
        _ => raw.to_string(),
    }
}

/// Whether a record is dated inside the stay. Empty dates are skipped
/// quietly; unparseable ones are logged.
fn in_stay(record: &Record, stay: &StayRange) -> bool {
    let raw = cell_text(record.get(COL_DATE));
    if raw.trim().is_empty() {
        return false;
    }

    match parse_sheet_date(&raw) {
        Some(date) => stay.contains(date),
        None => {
            tracing::warn!("Could not parse date: {}", raw);
            false
        }
    }
}

/// Numeric cell lookup. `Ok(None)` for a missing or blank cell, `Err` with
/// the raw text for anything that is not a number.
fn numeric_cell(record: &Record, column: &str) -> Result<Option<f64>, String> {
    match record.get(column) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| s.clone()),
        Some(other) => Err(other.to_string()),
    }
}

fn record_room_type(record: &Record) -> Option<String> {
    match record.get(COL_ROOM_TYPE) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let raw = cell_text(Some(value));
            (!raw.is_empty()).then(|| normalize_room_type(&raw))
        }
    }
}

/// Records dated inside the stay, with `Room_Type` normalized in place.
pub fn filter_pricing(records: Vec<Record>, stay: &StayRange) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| in_stay(record, stay))
        .map(|mut record| {
            if let Some(room_type) = record_room_type(&record) {
                record.insert(COL_ROOM_TYPE.to_string(), Value::String(room_type));
            }
            record
        })
        .collect()
}

/// Minimum rooms left per room type across the nights of the stay.
/// Falls back to the default counts when nothing matched or everything is
/// sold out.
pub fn aggregate_availability(records: &[Record], stay: &StayRange) -> BTreeMap<String, i64> {
    let mut availability: BTreeMap<String, i64> = BTreeMap::new();

    for record in records.iter().filter(|record| in_stay(record, stay)) {
        let Some(room_type) = record_room_type(record) else {
            continue;
        };

        let available = match numeric_cell(record, COL_AVAILABLE_ROOMS) {
            Ok(count) => count.unwrap_or(0.0) as i64,
            Err(raw) => {
                tracing::warn!(
                    "Skipping availability row for {}: Available_Rooms '{}' is not a number",
                    room_type,
                    raw
                );
                continue;
            }
        };

        availability
            .entry(room_type)
            .and_modify(|count| *count = (*count).min(available))
            .or_insert(available);
    }

    if availability.is_empty() || availability.values().all(|&count| count == 0) {
        tracing::info!("No availability in Pricing tab for stay, using defaults");
        return fallback::default_availability();
    }

    availability
}

fn nightly_price(record: &Record, adults: u32, breakfast: bool) -> Result<f64, String> {
    let mut price = if adults == 1 {
        numeric_cell(record, COL_SINGLE_RATE)?.unwrap_or(DEFAULT_SINGLE_RATE)
    } else {
        let mut price = numeric_cell(record, COL_DOUBLE_RATE)?.unwrap_or(DEFAULT_DOUBLE_RATE);
        if adults > 2 {
            let extra = numeric_cell(record, COL_EXTRA_PERSON)?
                .unwrap_or(fallback::EXTRA_PERSON_FEE as f64);
            price += f64::from(adults - 2) * extra;
        }
        price
    };

    if breakfast {
        price += numeric_cell(record, COL_WITH_BREAKFAST)?
            .unwrap_or(fallback::BREAKFAST_FEE as f64);
    }

    Ok(price)
}

/// Sum nightly prices for the requested room type over the stay. Uses the
/// flat rates when the sheet has nothing priced for that room.
pub fn quote_from_rows(
    records: &[Record],
    request: &PriceRequest,
    stay: &StayRange,
) -> PriceQuote {
    let wanted = normalize_room_type(&request.room_type);
    let mut total = 0.0;

    for record in records.iter().filter(|record| in_stay(record, stay)) {
        if record_room_type(record).as_deref() != Some(wanted.as_str()) {
            continue;
        }

        match nightly_price(record, request.adults, request.breakfast) {
            Ok(price) => total += price,
            Err(raw) => {
                tracing::warn!("Skipping pricing row with non-numeric rate '{}'", raw);
            }
        }
    }

    if total == 0.0 {
        tracing::info!("No sheet rates for {}, using flat rates", wanted);
        return fallback::flat_rate_quote(
            &wanted,
            request.adults,
            request.breakfast,
            stay.nights(),
        );
    }

    PriceQuote::new(total, stay.nights())
}
