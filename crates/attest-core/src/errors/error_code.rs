//! Stable string codes for every error variant.

/// Maps an error to a stable, machine-readable code for report layers.
pub trait AttestErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const TASK_NOT_FOUND: &str = "SCAN_TASK_NOT_FOUND";
pub const WINDOW_NOT_FOUND: &str = "SCAN_WINDOW_NOT_FOUND";
pub const SCAN_IO: &str = "SCAN_IO";
pub const EVALUATE_PERSIST: &str = "EVALUATE_PERSIST";
pub const CLEANUP_IO: &str = "CLEANUP_IO";
pub const STORE_TASK_UNKNOWN: &str = "STORE_TASK_UNKNOWN";
pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
