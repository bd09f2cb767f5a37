//! Local price cache: `<root>/asset_prices/<SYMBOL>.csv`.
//!
//! A cached file is never refreshed. Delete it to force a new download.

use crate::adapters::csv_adapter::{write_price_csv, CsvPriceAdapter, ASSET_PRICES_DIR};
use crate::domain::error::BuffetError;
use crate::ports::price_port::PriceHistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The file already existed; nothing was fetched.
    Cached,
    /// The history was fetched and written with this many rows.
    Downloaded(usize),
}

pub fn cache_ticker_history(
    source: &dyn PriceHistoryPort,
    data_root: &Path,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<CacheOutcome, BuffetError> {
    let path = CsvPriceAdapter::new(data_root).csv_path(symbol);
    if path.exists() {
        tracing::debug!(symbol, path = %path.display(), "price history already cached");
        return Ok(CacheOutcome::Cached);
    }

    let rows = source.fetch_history(symbol, start_date, end_date)?;
    fs::create_dir_all(data_root.join(ASSET_PRICES_DIR))?;
    write_price_csv(&path, &rows)?;
    tracing::info!(symbol, rows = rows.len(), path = %path.display(), "cached price history");
    Ok(CacheOutcome::Downloaded(rows.len()))
}
