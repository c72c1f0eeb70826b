use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImportError>;

/// Which input file a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    StationInfo,
    MonthlyValues,
    HistoryCatalog,
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::StationInfo => write!(f, "station info file"),
            FileKind::MonthlyValues => write!(f, "monthly value file"),
            FileKind::HistoryCatalog => write!(f, "history catalog file"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at line {line}: field '{field}' = '{value}' ({reason})")]
    MalformedRecord {
        line: u64,
        field: String,
        value: String,
        reason: String,
    },

    #[error("{kind} not found: {}", path.display())]
    FileNotFound { kind: FileKind, path: PathBuf },

    #[error("Climatology period not found: {key}")]
    PeriodNotFound { key: String },

    #[error("Climatology variable not found: {net_var_name}")]
    VariableNotFound { net_var_name: String },

    #[error("Referenced {table} row not found: {key}")]
    ReferenceNotFound { table: &'static str, key: String },

    #[error("Duplicate {table} row for key {key}")]
    DuplicateReference { table: &'static str, key: String },

    #[error(
        "Data integrity mismatch for station {station_id}: expected {expected} value rows, found {found} ({detail})"
    )]
    DataIntegrityMismatch {
        station_id: i64,
        expected: usize,
        found: usize,
        detail: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<config::ConfigError> for ImportError {
    fn from(err: config::ConfigError) -> Self {
        ImportError::Config(err.to_string())
    }
}

impl ImportError {
    pub fn malformed(line: u64, field: &str, value: &str, reason: impl Into<String>) -> Self {
        ImportError::MalformedRecord {
            line,
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the lookup misses that mean the registries were not run first.
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            ImportError::PeriodNotFound { .. }
                | ImportError::VariableNotFound { .. }
                | ImportError::ReferenceNotFound { .. }
        )
    }
}
