//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod csv_adapter;
pub mod file_config_adapter;
#[cfg(feature = "http")]
pub mod http_adapter;
pub mod json_content;
pub mod pdf_report;
pub mod price_cache;
pub mod yahoo_adapter;
