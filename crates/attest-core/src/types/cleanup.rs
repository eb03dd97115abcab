//! Cleanup output model: per-window migration results and the fleet summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identifiers::{TaskRef, WindowLabel};
use super::state::EvidenceLocation;

/// Result of reorganizing one window from the flat legacy layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResult {
    pub task_ref: TaskRef,
    pub window: WindowLabel,
    /// True when the window had loose content at the root and was (or, in a
    /// dry run, would have been) reorganized. False means a true no-op.
    pub was_flat_structure: bool,
    /// Destination subfolder -> number of content files moved.
    pub files_organized: BTreeMap<EvidenceLocation, usize>,
    /// Marker directories moved with the files (e.g. ".validation").
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub metadata_moved: Vec<String>,
    /// Per-file failures; the operation continued past each of these.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn new(task_ref: TaskRef, window: WindowLabel) -> Self {
        Self {
            task_ref,
            window,
            was_flat_structure: false,
            files_organized: BTreeMap::new(),
            metadata_moved: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn total_files_organized(&self) -> usize {
        self.files_organized.values().sum()
    }
}

/// Fleet-wide cleanup summary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CleanupSummary {
    pub total_tasks: usize,
    pub total_windows: usize,
    pub windows_cleaned: usize,
    pub files_organized: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub results: Vec<CleanupResult>,
    /// Window-level failures; remaining windows were still processed.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}
