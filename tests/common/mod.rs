#![allow(dead_code)]

use buffet::domain::error::BuffetError;
use buffet::domain::price::PriceRow;
use buffet::domain::report_table::ReportTable;
use buffet::ports::http_port::{HttpPort, HttpResponse};
use buffet::ports::price_port::PriceHistoryPort;
use buffet::ports::report_port::ReportPort;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct MockPriceSource {
    pub data: HashMap<String, Vec<PriceRow>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_rows(mut self, symbol: &str, rows: Vec<PriceRow>) -> Self {
        self.data.insert(symbol.to_string(), rows);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceHistoryPort for MockPriceSource {
    fn fetch_history(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRow>, BuffetError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BuffetError::Network {
                url: format!("mock://{}", symbol),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.date >= start_date && r.date <= end_date)
            .collect())
    }
}

/// Serves canned responses by URL; unknown URLs fail as network errors.
pub struct MockHttp {
    pub responses: HashMap<String, (u16, Vec<u8>)>,
    pub requests: RefCell<Vec<String>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), (status, body.as_bytes().to_vec()));
        self
    }
}

impl HttpPort for MockHttp {
    fn get(&self, url: &str) -> Result<HttpResponse, BuffetError> {
        self.requests.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Err(BuffetError::Network {
                url: url.to_string(),
                reason: "connection refused".into(),
            }),
        }
    }
}

/// Records the tables it is asked to write instead of producing a file.
pub struct MockReportPort {
    pub written: RefCell<Vec<(Vec<ReportTable>, PathBuf)>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, tables: &[ReportTable], output_path: &Path) -> Result<(), BuffetError> {
        self.written
            .borrow_mut()
            .push((tables.to_vec(), output_path.to_path_buf()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily rows Monday to Friday for each week starting 2025-01-06. Every day
/// of week `i` closes at `closes[i]`.
pub fn weekday_rows(closes: &[f64]) -> Vec<PriceRow> {
    let first_monday = date(2025, 1, 6);
    closes
        .iter()
        .enumerate()
        .flat_map(|(week, &close)| {
            (0..5).map(move |day| {
                PriceRow::new(
                    first_monday + chrono::Duration::days(week as i64 * 7 + day),
                    close,
                )
            })
        })
        .collect()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
