//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, AttestErrorCode};

/// Errors that can occur while scanning the evidence tree.
///
/// Unreadable markers and files are not errors — they are folded into the
/// window's degradation list.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Task directory not found for {task_ref}")]
    TaskNotFound { task_ref: String },

    #[error("Window directory not found: {task_ref}/{window}")]
    WindowNotFound { task_ref: String, window: String },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AttestErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TaskNotFound { .. } => error_code::TASK_NOT_FOUND,
            Self::WindowNotFound { .. } => error_code::WINDOW_NOT_FOUND,
            Self::Io { .. } => error_code::SCAN_IO,
        }
    }
}
