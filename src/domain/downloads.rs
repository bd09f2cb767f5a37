//! File downloads with change detection, and macro-series summaries.
//!
//! Both operations go through an [`HttpPort`], so the transport can be
//! swapped out in tests.

use crate::domain::error::BuffetError;
use crate::domain::schema::locate_columns;
use crate::ports::http_port::HttpPort;
use std::fs;
use std::path::Path;

/// Outcome of a successful download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    NewFile,
    Unchanged,
    Updated,
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            DownloadStatus::NewFile => "New file downloaded",
            DownloadStatus::Unchanged => "No Change, skipping file update",
            DownloadStatus::Updated => "Change detected, file updated",
        };
        f.write_str(text)
    }
}

/// Fetch `url` into `folder/file_name`, rewriting the file only when the
/// downloaded bytes differ from what is already on disk.
pub fn download_file_and_compare(
    http: &dyn HttpPort,
    url: &str,
    folder: &Path,
    file_name: &str,
) -> Result<DownloadStatus, BuffetError> {
    fs::create_dir_all(folder)?;

    let response = http.get(url)?;
    if !response.is_ok() {
        return Err(BuffetError::Download {
            url: url.to_string(),
            status: response.status,
        });
    }

    let file_path = folder.join(file_name);
    let status = if !file_path.exists() {
        fs::write(&file_path, &response.body)?;
        DownloadStatus::NewFile
    } else if fs::read(&file_path)? == response.body {
        DownloadStatus::Unchanged
    } else {
        fs::write(&file_path, &response.body)?;
        DownloadStatus::Updated
    };

    tracing::info!(url, path = %file_path.display(), %status, "download complete");
    Ok(status)
}

/// Summary of a downloaded macro series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub download: DownloadStatus,
    /// First and last value of the date column (ISO dates sort as text).
    pub date_range: Option<(String, String)>,
    pub record_count: usize,
    /// Last row's value for each data column; `None` when not numeric
    /// (FRED writes `.` for missing observations).
    pub latest_values: Vec<(String, Option<f64>)>,
}

/// Download a series CSV and summarise it. `columns[0]` is the date column,
/// the rest are data columns; all must be present.
pub fn process_series(
    http: &dyn HttpPort,
    url: &str,
    file_name: &str,
    columns: &[&str],
    folder: &Path,
) -> Result<SeriesSummary, BuffetError> {
    if columns.is_empty() {
        return Err(BuffetError::InvalidData {
            reason: "at least a date column is required".into(),
        });
    }

    let download = download_file_and_compare(http, url, folder, file_name)?;

    let file_path = folder.join(file_name);
    let content = fs::read_to_string(&file_path)?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    let idx = locate_columns(&headers, columns, file_name)?;

    let mut min_date: Option<String> = None;
    let mut max_date: Option<String> = None;
    let mut record_count = 0;
    let mut last: Option<csv::StringRecord> = None;

    for result in rdr.records() {
        let record = result?;
        let date = record.get(idx[0]).unwrap_or_default().trim().to_string();
        if min_date.as_ref().is_none_or(|m| date < *m) {
            min_date = Some(date.clone());
        }
        if max_date.as_ref().is_none_or(|m| date > *m) {
            max_date = Some(date);
        }
        record_count += 1;
        last = Some(record);
    }

    let latest_values = columns[1..]
        .iter()
        .zip(&idx[1..])
        .map(|(name, &i)| {
            let value = last
                .as_ref()
                .and_then(|r| r.get(i))
                .and_then(|v| v.trim().parse::<f64>().ok());
            (name.to_string(), value)
        })
        .collect();

    Ok(SeriesSummary {
        download,
        date_range: min_date.zip(max_date),
        record_count,
        latest_values,
    })
}
