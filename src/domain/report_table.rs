//! Rectangular report datasets built from a [`Content`].
//!
//! The producer decides whether a table carries a trailing "Total" column by
//! choosing [`ReportTable::with_totals`] or [`ReportTable::without_totals`].

use crate::domain::content::{Content, DataKind};
use crate::domain::error::BuffetError;

pub const TOTAL_HEADER: &str = "Total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Totals {
    Included,
    Omitted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub description: String,
    /// One cell per value column; `None` for a series with no data.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    pub title: String,
    pub kind: DataKind,
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
    pub totals: Totals,
}

/// Ids of the highest and lowest row per value column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extremes {
    pub highest: Vec<Option<String>>,
    pub lowest: Vec<Option<String>>,
}

impl ReportTable {
    pub fn with_totals(content: &Content) -> Result<Self, BuffetError> {
        Self::build(content, Totals::Included)
    }

    pub fn without_totals(content: &Content) -> Result<Self, BuffetError> {
        Self::build(content, Totals::Omitted)
    }

    fn build(content: &Content, totals: Totals) -> Result<Self, BuffetError> {
        let time = &content.metadata.time;
        let mut columns = time.clone();
        if totals == Totals::Included {
            columns.push(TOTAL_HEADER.to_string());
        }

        let mut rows = Vec::with_capacity(content.data.len());
        for series in &content.data {
            let mut values: Vec<Option<f64>> = if series.timeseries.is_empty() {
                vec![None; time.len()]
            } else if series.timeseries.len() == time.len() {
                series.timeseries.iter().copied().map(Some).collect()
            } else {
                return Err(BuffetError::ShapeMismatch {
                    id: series.id.clone(),
                    expected: time.len(),
                    actual: series.timeseries.len(),
                });
            };
            if totals == Totals::Included {
                values.push(Some(series.total));
            }
            rows.push(TableRow {
                id: series.id.clone(),
                description: series.description.clone(),
                values,
            });
        }

        Ok(Self {
            title: content.metadata.name.clone(),
            kind: content.kind(),
            columns,
            rows,
            totals,
        })
    }

    pub fn is_price(&self) -> bool {
        self.kind == DataKind::Price
    }

    /// Max and min row per column. Ties go to the earliest row; empty cells
    /// never win.
    pub fn extremes(&self) -> Extremes {
        let mut result = Extremes::default();
        for col in 0..self.columns.len() {
            let mut best: Option<(f64, &str)> = None;
            let mut worst: Option<(f64, &str)> = None;
            for row in &self.rows {
                let Some(Some(value)) = row.values.get(col).copied() else {
                    continue;
                };
                if value.is_nan() {
                    continue;
                }
                if best.is_none_or(|(b, _)| value > b) {
                    best = Some((value, row.id.as_str()));
                }
                if worst.is_none_or(|(w, _)| value < w) {
                    worst = Some((value, row.id.as_str()));
                }
            }
            result.highest.push(best.map(|(_, id)| id.to_string()));
            result.lowest.push(worst.map(|(_, id)| id.to_string()));
        }
        result
    }
}
