//! Data model for the evidence lifecycle engine.

pub mod cleanup;
pub mod collections;
pub mod evaluation;
pub mod identifiers;
pub mod markers;
pub mod state;
pub mod task;
