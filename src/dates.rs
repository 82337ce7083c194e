//! Date handling for stays and spreadsheet cells
//!
//! Request bodies carry ISO dates only. Spreadsheet cells are typed by hand,
//! so `parse_sheet_date` accepts the three layouts seen in the Pricing tab.

use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::error::AppError;

pub const REQUEST_DATE_FORMAT: &str = "%Y-%m-%d";

/// Tried in order; the first layout that parses wins.
/// Day-first dates are ambiguous with month-first ones, so `03/04/2024`
/// is always read as March 4th.
pub const SHEET_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

pub fn parse_request_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), REQUEST_DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(raw.to_string()))
}

pub fn parse_sheet_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    SHEET_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Render a spreadsheet cell as text. Numbers keep their JSON form and
/// null/missing cells become the empty string.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Half-open date interval `[check_in, check_out)`: one entry per night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self { check_in, check_out }
    }

    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, AppError> {
        Ok(Self::new(
            parse_request_date(check_in)?,
            parse_request_date(check_out)?,
        ))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// Signed, so a reversed stay yields a negative count.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let check_in = self.check_in;
        (0..self.nights().max(0)).map(move |offset| check_in + Duration::days(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sheet_date_formats() {
        assert_eq!(parse_sheet_date("2024-01-05"), Some(date(2024, 1, 5)));
        assert_eq!(parse_sheet_date("1/5/2024"), Some(date(2024, 1, 5)));
        // Only valid as day-first
        assert_eq!(parse_sheet_date("25/12/2024"), Some(date(2024, 12, 25)));
        // Ambiguous: month-first wins
        assert_eq!(parse_sheet_date("03/04/2024"), Some(date(2024, 3, 4)));
        assert_eq!(parse_sheet_date("next tuesday"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn test_request_date_is_iso_only() {
        assert_eq!(parse_request_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(matches!(
            parse_request_date("02/29/2024"),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_stay_range_is_half_open() {
        let stay = StayRange::new(date(2024, 1, 1), date(2024, 1, 3));
        assert!(stay.contains(date(2024, 1, 1)));
        assert!(stay.contains(date(2024, 1, 2)));
        assert!(!stay.contains(date(2024, 1, 3)));
        assert_eq!(stay.nights(), 2);
        assert_eq!(
            stay.days().collect::<Vec<_>>(),
            vec![date(2024, 1, 1), date(2024, 1, 2)]
        );
    }

    #[test]
    fn test_reversed_stay_has_no_days() {
        let stay = StayRange::new(date(2024, 1, 3), date(2024, 1, 1));
        assert_eq!(stay.nights(), -2);
        assert_eq!(stay.days().count(), 0);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&json!(null))), "");
        assert_eq!(cell_text(Some(&json!("2024-01-01"))), "2024-01-01");
        assert_eq!(cell_text(Some(&json!(45292))), "45292");
    }
}
