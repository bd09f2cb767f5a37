//! Report generation port trait.

use crate::domain::error::BuffetError;
use crate::domain::report_table::ReportTable;
use std::path::Path;

/// Port for writing a multi-table report document.
pub trait ReportPort {
    fn write(&self, tables: &[ReportTable], output_path: &Path) -> Result<(), BuffetError>;
}
