//! # attest-engine
//!
//! The evidence lifecycle engine: a directory scanner that infers task
//! state from filesystem signals, an in-memory aggregator for fleet
//! summaries, a weighted multi-dimension evaluator, and an idempotent
//! reorganizer for the legacy flat layout.

#![allow(clippy::module_inception)]

pub mod cache;
pub mod cleanup;
pub mod evaluator;
pub mod scanner;

pub use cache::StateCache;
pub use cleanup::EvidenceCleanup;
pub use evaluator::EvidenceEvaluator;
pub use scanner::{EvidenceScanner, ScanCancellation};
