//! In-memory spreadsheet (for development/testing).

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::{records_from_rows, SheetStore};
use crate::error::SheetError;
use crate::models::Record;

/// Tabs held as raw rows, header first, exactly as the sheet would store
/// them.
pub struct MemorySheets {
    tabs: RwLock<HashMap<String, Vec<Vec<Value>>>>,
}

impl MemorySheets {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tabs: RwLock::new(HashMap::new()),
        }
    }

    /// Adds (or replaces) a tab with the given header and data rows.
    #[must_use]
    pub fn with_tab(self, tab: &str, header: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let mut all = Vec::with_capacity(rows.len() + 1);
        all.push(header.iter().map(|h| Value::from(*h)).collect());
        all.extend(rows);
        self.tabs.write().insert(tab.to_string(), all);
        self
    }

    /// Raw rows of a tab including the header.
    pub fn rows(&self, tab: &str) -> Option<Vec<Vec<Value>>> {
        self.tabs.read().get(tab).cloned()
    }
}

impl Default for MemorySheets {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SheetStore for MemorySheets {
    async fn records(&self, tab: &str) -> Result<Vec<Record>, SheetError> {
        let tabs = self.tabs.read();
        let rows = tabs
            .get(tab)
            .ok_or_else(|| SheetError::TabNotFound(tab.to_string()))?;

        // Cells go through the same text conversion the live sheet applies
        let as_text: Vec<Vec<Value>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Value::String(_) => cell.clone(),
                        Value::Null => Value::String(String::new()),
                        other => Value::String(other.to_string()),
                    })
                    .collect()
            })
            .collect();

        Ok(records_from_rows(&as_text))
    }

    async fn append_row(&self, tab: &str, row: Vec<Value>) -> Result<(), SheetError> {
        let mut tabs = self.tabs.write();
        let rows = tabs
            .get_mut(tab)
            .ok_or_else(|| SheetError::TabNotFound(tab.to_string()))?;
        rows.push(row);
        Ok(())
    }
}
