//! Yahoo Finance price history source.
//!
//! Fetches daily closes from Yahoo's v8 chart API. Yahoo has no official API
//! and changes its response format without notice; the local CSV cache is the
//! fallback when it is unavailable.

use crate::domain::error::BuffetError;
use crate::domain::price::PriceRow;
use crate::ports::http_port::HttpPort;
use crate::ports::price_port::PriceHistoryPort;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

pub struct YahooAdapter<'a> {
    http: &'a dyn HttpPort,
}

impl<'a> YahooAdapter<'a> {
    pub fn new(http: &'a dyn HttpPort) -> Self {
        Self { http }
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = start_ts + (end - start).num_seconds() + 86_399;
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    fn parse_response(symbol: &str, body: &[u8]) -> Result<Vec<PriceRow>, BuffetError> {
        let format_changed = |reason: String| BuffetError::InvalidData {
            reason: format!("{}: unexpected chart response: {}", symbol, reason),
        };

        let resp: ChartResponse = serde_json::from_slice(body)?;
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) => {
                return Err(format_changed(format!("{}: {}", err.code, err.description)));
            }
            (None, None) => return Err(format_changed("empty result with no error".into())),
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| format_changed("result array is empty".into()))?;
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| format_changed("no quote data".into()))?;

        let mut rows = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| format_changed(format!("invalid timestamp: {}", ts)))?;
            // Holidays and halted sessions come back with a null close.
            if let Some(close) = quote.close.get(i).copied().flatten() {
                rows.push(PriceRow::new(date, close));
            }
        }
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }
}

impl PriceHistoryPort for YahooAdapter<'_> {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BuffetError> {
        let url = Self::chart_url(symbol, start_date, end_date);
        let response = self.http.get(&url)?;
        if !response.is_ok() {
            return Err(BuffetError::Download {
                url,
                status: response.status,
            });
        }
        let rows = Self::parse_response(symbol, &response.body)?;
        tracing::info!(symbol, rows = rows.len(), "fetched price history");
        Ok(rows
            .into_iter()
            .filter(|r| r.date >= start_date && r.date <= end_date)
            .collect())
    }
}
