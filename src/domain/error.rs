//! Domain error types.

/// Top-level error type for fincast.
#[derive(Debug, thiserror::Error)]
pub enum FincastError {
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

    #[error("transaction parse error on line {line}: {reason}")]
    TransactionParse { line: usize, reason: String },

    #[error("invalid transaction '{id}': {reason}")]
    TransactionInvalid { id: String, reason: String },

    #[error("settings value {field} must be finite")]
    NonFinite { field: String },

    #[error("projection of {years} years is out of range: {reason}")]
    HorizonOutOfRange { years: u32, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FincastError> for std::process::ExitCode {
    fn from(err: &FincastError) -> Self {
        let code: u8 = match err {
            FincastError::Io(_) => 1,
            FincastError::ConfigParse { .. }
            | FincastError::ConfigMissing { .. }
            | FincastError::ConfigInvalid { .. } => 2,
            FincastError::TransactionParse { .. } | FincastError::TransactionInvalid { .. } => 3,
            FincastError::NonFinite { .. } | FincastError::HorizonOutOfRange { .. } => 4,
            FincastError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
