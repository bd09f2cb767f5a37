//! Header-based column lookup for tabular inputs.

use crate::domain::error::BuffetError;

/// Index of each wanted column in `headers`, or every missing column.
pub fn locate_columns(
    headers: &csv::StringRecord,
    wanted: &[&str],
    source_name: &str,
) -> Result<Vec<usize>, BuffetError> {
    let mut found = Vec::with_capacity(wanted.len());
    let mut missing = Vec::new();
    for name in wanted {
        match headers.iter().position(|h| h.trim() == *name) {
            Some(i) => found.push(i),
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(BuffetError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        });
    }
    Ok(found)
}
