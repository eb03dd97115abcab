//! # attest-core
//!
//! Foundation crate for the Attest evidence lifecycle engine.
//! Defines the data model, traits, errors, config, and tracing setup.
//! The engine crate depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use errors::error_code::AttestErrorCode;
pub use traits::TaskStore;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::identifiers::{TaskRef, WindowLabel};
pub use types::state::{
    AutomationCapability, EvidenceLocation, EvidenceTaskState, FileRef, LocalEvidenceState,
    WindowLayout, WindowState,
};
pub use types::task::TaskDescriptor;
