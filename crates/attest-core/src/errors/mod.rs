//! Error types for the evidence lifecycle engine.
//!
//! One enum per subsystem, each mapped to stable error codes via
//! [`error_code::AttestErrorCode`]. Taxonomy: NotFound variants are hard
//! errors; everything recoverable is degraded in place and never becomes
//! an error at all.

pub mod cleanup_error;
pub mod error_code;
pub mod evaluate_error;
pub mod scan_error;
pub mod store_error;

pub use cleanup_error::CleanupError;
pub use evaluate_error::EvaluateError;
pub use scan_error::ScanError;
pub use store_error::TaskStoreError;
