//! Spreadsheet storage backends.
//!
//! The spreadsheet stands in for a database: each tab is a table whose first
//! row holds the column names.

mod cached;
mod google;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SheetError;
use crate::models::Record;

pub use cached::CachedSheets;
pub use google::GoogleSheets;
pub use memory::MemorySheets;

/// Trait for spreadsheet backends.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// All data rows of a tab as header-keyed records.
    async fn records(&self, tab: &str) -> Result<Vec<Record>, SheetError>;

    /// Appends one row after the last data row of a tab.
    async fn append_row(&self, tab: &str, row: Vec<Value>) -> Result<(), SheetError>;
}

/// Convert typed-in cell text to a JSON number where it looks like one.
/// Empty cells stay empty strings.
pub fn numericise(cell: &str) -> Value {
    if let Ok(n) = cell.parse::<i64>() {
        return Value::from(n);
    }

    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(cell.to_string()),
    }
}

/// Build records from a header row plus data rows. Short rows are padded
/// with empty strings and cells beyond the header are dropped.
pub fn records_from_rows(rows: &[Vec<Value>]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };

    let columns: Vec<String> = header.iter().map(cell_string).collect();

    data.iter()
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    let value = match row.get(i) {
                        Some(Value::String(s)) => numericise(s),
                        Some(Value::Null) | None => Value::String(String::new()),
                        Some(other) => other.clone(),
                    };
                    (column.clone(), value)
                })
                .collect()
        })
        .collect()
}

fn cell_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
