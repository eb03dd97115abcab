//! Evaluator errors.

use std::path::PathBuf;

use super::error_code::{self, AttestErrorCode};
use super::scan_error::ScanError;

/// Errors that can occur while evaluating evidence.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Failed to persist a validation record. The in-memory evaluation
    /// result is still valid; callers treat this as a warning.
    #[error("Failed to persist validation record to {path}: {message}")]
    Persist { path: PathBuf, message: String },
}

impl AttestErrorCode for EvaluateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Persist { .. } => error_code::EVALUATE_PERSIST,
        }
    }
}
