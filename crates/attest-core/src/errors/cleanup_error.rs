//! Cleanup errors.

use std::path::PathBuf;

use super::error_code::{self, AttestErrorCode};
use super::scan_error::ScanError;

/// Errors that abort a whole cleanup operation.
///
/// Per-file move failures never reach this type — they are collected into
/// the result's error list and the operation continues.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AttestErrorCode for CleanupError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Io { .. } => error_code::CLEANUP_IO,
        }
    }
}
