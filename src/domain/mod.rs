//! Core domain types and logic.

pub mod config_validation;
pub mod content;
pub mod downloads;
pub mod error;
pub mod price;
pub mod report_table;
pub mod schema;
pub mod settings;
pub mod universe;
pub mod weekly;
