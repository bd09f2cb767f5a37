//! Reading and writing `Content` JSON files.

use crate::domain::content::Content;
use crate::domain::error::BuffetError;
use std::fs;
use std::path::Path;

pub fn load_content(path: &Path) -> Result<Content, BuffetError> {
    let json = fs::read_to_string(path)?;
    Ok(Content::from_json(&json)?)
}

pub fn save_content(path: &Path, content: &Content) -> Result<(), BuffetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content.to_json()?)?;
    tracing::debug!(path = %path.display(), name = %content.metadata.name, "saved content");
    Ok(())
}
