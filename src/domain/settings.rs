//! Typed configuration values handed explicitly to collaborators.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_OUTPUT: &str = "asset_returns.pdf";

/// Location of the on-disk finance data tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceConfig {
    pub data_root: PathBuf,
}

impl FinanceConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }
}

/// What goes into a weekly report run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub symbols: Vec<String>,
    /// Keyed by upper-case symbol.
    pub descriptions: HashMap<String, String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub output: PathBuf,
    pub download: bool,
}
