//! Typed per-operation requests.
//!
//! These replace untyped flag maps at the CLI boundary: the report layer
//! builds one of these and hands it to the engine.

use serde::{Deserialize, Serialize};

use crate::types::identifiers::{TaskRef, WindowLabel};
use crate::types::state::EvidenceLocation;

/// Request for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub task_ref: TaskRef,
    pub window: WindowLabel,
    /// Restrict the evaluation to one physical subfolder.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subfolder: Option<EvidenceLocation>,
    /// Persist the result as a validation record under the window.
    #[serde(default)]
    pub persist: bool,
}

/// Request for a cleanup pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupRequest {
    /// Target task; `None` means every task under the evidence root.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub task_ref: Option<TaskRef>,
    /// Target window; `None` means every window of the targeted task(s).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub window: Option<WindowLabel>,
    /// Classify and count without touching the filesystem.
    #[serde(default)]
    pub dry_run: bool,
}
