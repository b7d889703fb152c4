use std::path::PathBuf;

use thiserror::Error;

/// Stage-level error type.
/// Any of these aborts the running stage; per-row problems are logged and skipped instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Required input not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Required CSV columns not found: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid processed data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Maps an I/O failure on a required input to `MissingInput` when the file is absent.
    pub fn from_input_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::MissingInput(path.into())
        } else {
            AppError::Io(err)
        }
    }
}
