//! Weekly aggregation of daily price histories.
//!
//! Each symbol's rows are bucketed into Monday-anchored weeks keyed by the
//! Monday's `MM-DD` label. The last close of a bucket represents the week;
//! percent changes are taken week over week. All symbols are then aligned on
//! the sorted union of labels, and every symbol must cover every label.
//!
//! Labels carry no year, so two Mondays with the same month and day in
//! different years share one label and the later week wins when aligning.

use crate::domain::content::{AssetSeries, Content, DataKind};
use crate::domain::error::BuffetError;
use crate::domain::price::{round2, week_label, PriceRow, SymbolSeries};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const CHANGES_TITLE: &str = "Prior Week Asset Returns";
pub const PRICES_TITLE: &str = "Weekly Asset Prices";

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyPoint {
    pub label: String,
    pub change: f64,
    pub close: f64,
}

/// Bucket one symbol's rows into weeks, in chronological order.
pub fn weekly_points(symbol: &str, rows: &[PriceRow]) -> Result<Vec<WeeklyPoint>, BuffetError> {
    // week start -> (latest date seen, its close)
    let mut buckets: BTreeMap<NaiveDate, (NaiveDate, f64)> = BTreeMap::new();
    for row in rows {
        let entry = buckets
            .entry(row.week_start())
            .or_insert((row.date, row.close));
        if row.date >= entry.0 {
            *entry = (row.date, row.close);
        }
    }

    let mut points = Vec::with_capacity(buckets.len());
    let mut previous_close: Option<f64> = None;

    for (monday, (_, close)) in buckets {
        let close = round2(close);
        let change = match previous_close {
            Some(prev) => percent_change(symbol, prev, close)?,
            // First week: no prior reference point.
            None => 0.0,
        };
        points.push(WeeklyPoint {
            label: week_label(monday),
            change,
            close,
        });
        previous_close = Some(close);
    }

    Ok(points)
}

fn percent_change(symbol: &str, from: f64, to: f64) -> Result<f64, BuffetError> {
    if from == 0.0 {
        return Err(BuffetError::Arithmetic {
            symbol: symbol.to_string(),
            reason: "division by zero: reference close is 0".into(),
        });
    }
    Ok(round2((to - from) / from * 100.0))
}

/// Sorted, de-duplicated union of every week label.
pub fn shared_time_axis(weekly: &[Vec<WeeklyPoint>]) -> Vec<String> {
    let labels: BTreeSet<&str> = weekly
        .iter()
        .flat_map(|points| points.iter().map(|p| p.label.as_str()))
        .collect();
    labels.into_iter().map(str::to_string).collect()
}

fn align(
    symbol: &str,
    time: &[String],
    values: &HashMap<&str, f64>,
) -> Result<Vec<f64>, BuffetError> {
    time.iter()
        .map(|label| {
            values
                .get(label.as_str())
                .copied()
                .ok_or_else(|| BuffetError::Alignment {
                    symbol: symbol.to_string(),
                    label: label.clone(),
                })
        })
        .collect()
}

/// Build the weekly returns and weekly prices contents, in input order.
pub fn aggregate(series: &[SymbolSeries]) -> Result<(Content, Content), BuffetError> {
    let weekly = series
        .iter()
        .map(|s| weekly_points(&s.id, &s.rows))
        .collect::<Result<Vec<_>, _>>()?;

    let time = shared_time_axis(&weekly);
    let mut changes = Content::new(CHANGES_TITLE, DataKind::Return, time.clone());
    let mut prices = Content::new(PRICES_TITLE, DataKind::Price, time.clone());

    for (symbol, points) in series.iter().zip(&weekly) {
        if points.is_empty() {
            tracing::warn!(symbol = %symbol.id, "no price rows, emitting empty series");
            changes.data.push(empty_series(symbol));
            prices.data.push(empty_series(symbol));
            continue;
        }

        // Later weeks overwrite earlier ones when labels collide across years.
        let by_change: HashMap<&str, f64> =
            points.iter().map(|p| (p.label.as_str(), p.change)).collect();
        let by_close: HashMap<&str, f64> =
            points.iter().map(|p| (p.label.as_str(), p.close)).collect();

        let price_series = align(&symbol.id, &time, &by_close)?;
        let change_series = align(&symbol.id, &time, &by_change)?;

        let (first, last) = match (price_series.first(), price_series.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (0.0, 0.0),
        };

        changes.data.push(AssetSeries {
            id: symbol.id.clone(),
            description: symbol.description.clone(),
            timeseries: change_series,
            total: percent_change(&symbol.id, first, last)?,
        });
        prices.data.push(AssetSeries {
            id: symbol.id.clone(),
            description: symbol.description.clone(),
            timeseries: price_series,
            total: round2(last - first),
        });
    }

    tracing::debug!(
        symbols = series.len(),
        weeks = changes.metadata.time.len(),
        "aggregated weekly data"
    );
    Ok((changes, prices))
}

fn empty_series(symbol: &SymbolSeries) -> AssetSeries {
    AssetSeries {
        id: symbol.id.clone(),
        description: symbol.description.clone(),
        timeseries: Vec::new(),
        total: 0.0,
    }
}
