//! Task store errors.

use super::error_code::{self, AttestErrorCode};

/// Errors from the external task descriptor store.
///
/// Scan and evaluation callers degrade on these (unknown automation level,
/// empty descriptor) instead of aborting.
#[derive(Debug, thiserror::Error)]
pub enum TaskStoreError {
    #[error("Unknown task: {task_ref}")]
    UnknownTask { task_ref: String },

    #[error("Task store unavailable: {message}")]
    Unavailable { message: String },
}

impl AttestErrorCode for TaskStoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTask { .. } => error_code::STORE_TASK_UNKNOWN,
            Self::Unavailable { .. } => error_code::STORE_UNAVAILABLE,
        }
    }
}
