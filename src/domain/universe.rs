//! Report universe: the ordered symbol list and its price histories.
//!
//! Parses symbol lists from configuration and loads each symbol's daily
//! history through a [`PriceHistoryPort`], skipping symbols whose history
//! cannot be read.

use crate::domain::error::BuffetError;
use crate::domain::price::SymbolSeries;
use crate::ports::price_port::PriceHistoryPort;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: String,
}

pub struct LoadedUniverse {
    pub series: Vec<SymbolSeries>,
    pub skipped: Vec<SkippedSymbol>,
}

/// Whether a fetch failure means the history is unavailable rather than
/// malformed.
fn is_unavailable(err: &BuffetError) -> bool {
    matches!(
        err,
        BuffetError::Io(_) | BuffetError::Network { .. } | BuffetError::Download { .. }
    )
}

/// Fetch every symbol's history in order. Symbols whose history is
/// unavailable are skipped; a malformed history fails the load. An empty
/// history is kept and aggregates to an empty series.
pub fn load_universe(
    source: &dyn PriceHistoryPort,
    symbols: &[String],
    descriptions: &HashMap<String, String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<LoadedUniverse, BuffetError> {
    let mut series = Vec::with_capacity(symbols.len());
    let mut skipped = Vec::new();

    for symbol in symbols {
        match source.fetch_history(symbol, start_date, end_date) {
            Ok(rows) => {
                tracing::info!(%symbol, rows = rows.len(), "loaded price history");
                let description = descriptions.get(symbol).cloned().unwrap_or_default();
                series.push(SymbolSeries::new(symbol.clone(), description, rows));
            }
            Err(e) if !is_unavailable(&e) => {
                tracing::error!(%symbol, error = %e, "malformed price history");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(%symbol, error = %e, "skipping symbol");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if series.is_empty() && !symbols.is_empty() {
        return Err(BuffetError::InvalidData {
            reason: format!("no price history could be loaded for {}", symbols.join(", ")),
        });
    }

    Ok(LoadedUniverse { series, skipped })
}
