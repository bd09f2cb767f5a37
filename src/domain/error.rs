//! Domain error types.

/// Top-level error type for buffet.
#[derive(Debug, thiserror::Error)]
pub enum BuffetError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("download of {url} failed with status code {status}")]
    Download { url: String, status: u16 },

    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("required columns not found in {source_name}: {}", columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("invalid data: {reason}")]
    InvalidData { reason: String },

    #[error("{symbol} has no value for week {label}")]
    Alignment { symbol: String, label: String },

    #[error("arithmetic error for {symbol}: {reason}")]
    Arithmetic { symbol: String, reason: String },

    #[error("series {id} has {actual} values but the time axis has {expected}")]
    ShapeMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("text cannot be encoded in the report font: {text:?}")]
    UnencodableText { text: String },

    #[error("pdf error: {reason}")]
    Pdf { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for BuffetError {
    fn from(err: lopdf::Error) -> Self {
        BuffetError::Pdf {
            reason: err.to_string(),
        }
    }
}

impl From<&BuffetError> for std::process::ExitCode {
    fn from(err: &BuffetError) -> Self {
        let code: u8 = match err {
            BuffetError::Io(_) => 1,
            BuffetError::ConfigParse { .. }
            | BuffetError::ConfigMissing { .. }
            | BuffetError::ConfigInvalid { .. } => 2,
            BuffetError::Download { .. } | BuffetError::Network { .. } => 3,
            BuffetError::MissingColumns { .. }
            | BuffetError::InvalidData { .. }
            | BuffetError::Alignment { .. }
            | BuffetError::Arithmetic { .. }
            | BuffetError::ShapeMismatch { .. }
            | BuffetError::Json(_)
            | BuffetError::Csv(_) => 4,
            BuffetError::UnencodableText { .. } | BuffetError::Pdf { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
