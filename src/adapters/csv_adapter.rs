//! CSV file price history adapter.
//!
//! Reads `<root>/asset_prices/<SYMBOL>.csv`. Columns are located by header
//! name, so files with extra columns (`Open`, `Volume`, `Dividends`, ...) work
//! as long as `Date` and `Close` are present.

use crate::domain::error::BuffetError;
use crate::domain::price::{parse_date_prefix, round2, PriceRow};
use crate::domain::schema::locate_columns;
use crate::ports::price_port::PriceHistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const ASSET_PRICES_DIR: &str = "asset_prices";

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    /// `data_root` is the configured finance data directory.
    pub fn new(data_root: &Path) -> Self {
        Self {
            base_path: data_root.join(ASSET_PRICES_DIR),
        }
    }

    pub fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl PriceHistoryPort for CsvPriceAdapter {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BuffetError> {
        let rows = read_price_csv(&self.csv_path(symbol))?;
        Ok(rows
            .into_iter()
            .filter(|r| r.date >= start_date && r.date <= end_date)
            .collect())
    }
}

pub fn read_price_csv(path: &Path) -> Result<Vec<PriceRow>, BuffetError> {
    let content = fs::read_to_string(path)?;
    parse_price_csv(&content, &path.display().to_string())
}

pub fn parse_price_csv(content: &str, source_name: &str) -> Result<Vec<PriceRow>, BuffetError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    let idx = locate_columns(&headers, &["Date", "Close"], source_name)?;
    let (date_idx, close_idx) = (idx[0], idx[1]);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let date_str = record.get(date_idx).unwrap_or_default();
        let date = parse_date_prefix(date_str).ok_or_else(|| BuffetError::InvalidData {
            reason: format!("{}: invalid date {:?}", source_name, date_str),
        })?;

        let close_str = record.get(close_idx).unwrap_or_default().trim();
        let close: f64 = close_str.parse().map_err(|e| BuffetError::InvalidData {
            reason: format!("{}: invalid close value {:?}: {}", source_name, close_str, e),
        })?;

        rows.push(PriceRow { date, close });
    }

    rows.sort_by_key(|r| r.date);
    Ok(rows)
}

/// Read one numeric column of a dated CSV, such as a FRED download.
/// Rows whose value is blank or `.` (FRED's missing observation) are skipped.
pub fn read_dated_column(
    path: &Path,
    date_column: &str,
    value_column: &str,
) -> Result<Vec<(NaiveDate, f64)>, BuffetError> {
    let source_name = path.display().to_string();
    let content = fs::read_to_string(path)?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    let idx = locate_columns(&headers, &[date_column, value_column], &source_name)?;

    let mut points = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let raw_value = record.get(idx[1]).unwrap_or_default().trim();
        if raw_value.is_empty() || raw_value == "." {
            continue;
        }
        let raw_date = record.get(idx[0]).unwrap_or_default();
        let date = parse_date_prefix(raw_date).ok_or_else(|| BuffetError::InvalidData {
            reason: format!("{}: invalid date {:?}", source_name, raw_date),
        })?;
        let value: f64 = raw_value.parse().map_err(|e| BuffetError::InvalidData {
            reason: format!("{}: invalid {} value {:?}: {}", source_name, value_column, raw_value, e),
        })?;
        points.push((date, value));
    }
    points.sort_by_key(|p| p.0);
    Ok(points)
}

/// Write `Date,Close` rows with ISO dates and closes rounded to cents.
pub fn write_price_csv(path: &Path, rows: &[PriceRow]) -> Result<(), BuffetError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Date", "Close"])?;
    for row in rows {
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", round2(row.close)),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
