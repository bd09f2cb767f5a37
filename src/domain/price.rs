//! Daily price rows and the date helpers used to bucket them.

use chrono::{Datelike, NaiveDate};

/// One trading day's closing price for a symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceRow {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Monday of the week this row falls in.
    pub fn week_start(&self) -> NaiveDate {
        week_start(self.date)
    }
}

/// A symbol's daily history together with its display description.
#[derive(Debug, Clone)]
pub struct SymbolSeries {
    pub id: String,
    pub description: String,
    pub rows: Vec<PriceRow>,
}

impl SymbolSeries {
    pub fn new(id: impl Into<String>, description: impl Into<String>, rows: Vec<PriceRow>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            rows,
        }
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    date - chrono::Duration::days(offset)
}

/// Week-start label: `MM-DD` of the Monday, year discarded.
pub fn week_label(date: NaiveDate) -> String {
    week_start(date).format("%m-%d").to_string()
}

/// Round to 2 decimal places, exact half-cent ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Parse a `YYYY-MM-DD` date, ignoring any trailing time or UTC offset
/// (`2025-01-02 00:00:00-05:00`).
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
