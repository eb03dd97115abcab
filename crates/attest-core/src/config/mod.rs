//! Engine configuration and typed per-operation requests.

pub mod engine_config;
pub mod requests;

pub use engine_config::EngineConfig;
pub use requests::{CleanupRequest, EvaluateRequest};
