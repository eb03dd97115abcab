//! Scan output model: task and window state, file inventory, and the
//! marker-driven state classification rule shared by scanner and cleanup.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{TaskRef, WindowLabel};

/// Lifecycle state inferred from metadata markers. Content files alone
/// never advance this state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum LocalEvidenceState {
    #[default]
    NoEvidence,
    Generated,
    Validated,
    Submitted,
    Rejected,
    Accepted,
}

impl LocalEvidenceState {
    /// Lifecycle rank used to pick a task's most relevant window.
    /// The derived `Ord` follows declaration order, which is the rank order.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Automation level for a task, derived solely from its external descriptor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum AutomationCapability {
    Fully,
    Partially,
    Manual,
    #[default]
    Unknown,
}

/// Status recorded in a submission marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Draft,
    Validated,
    #[default]
    Submitted,
    Accepted,
    Rejected,
    /// Unrecognized status string: treated as a non-terminal submission
    /// rather than failing the whole marker parse.
    #[serde(other)]
    Unknown,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// Classify a window from marker presence alone.
///
/// Priority (highest wins): terminal submission status, any submission
/// marker, validation marker, generation marker, nothing.
pub fn classify_window(
    has_generation: bool,
    has_validation: bool,
    submission: Option<SubmissionStatus>,
) -> LocalEvidenceState {
    match submission {
        Some(SubmissionStatus::Accepted) => LocalEvidenceState::Accepted,
        Some(SubmissionStatus::Rejected) => LocalEvidenceState::Rejected,
        Some(_) => LocalEvidenceState::Submitted,
        None if has_validation => LocalEvidenceState::Validated,
        None if has_generation => LocalEvidenceState::Generated,
        None => LocalEvidenceState::NoEvidence,
    }
}

/// Physical location of a content file within a window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLocation {
    #[default]
    Root,
    Wip,
    Ready,
    Submitted,
    Archive,
}

impl EvidenceLocation {
    pub fn dir_name(self) -> Option<&'static str> {
        match self {
            Self::Root => None,
            Self::Wip => Some("wip"),
            Self::Ready => Some("ready"),
            Self::Submitted => Some("submitted"),
            Self::Archive => Some("archive"),
        }
    }
}

/// Physical layout tag for a whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowLayout {
    /// Content files sit directly under the window root (legacy layout,
    /// also the tag for an empty window).
    #[default]
    Flat,
    Wip,
    Ready,
    Submitted,
    Archive,
}

/// One content file's identity and facts, built by the FileRef builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub filename: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub modified_at: DateTime<Utc>,
    pub location: EvidenceLocation,
}

/// A non-fatal problem encountered while scanning: the item it concerns
/// and why it was degraded instead of read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub location: String,
    pub reason: String,
}

/// Evidence state for one collection window, rebuilt fresh on every scan.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WindowState {
    pub window: WindowLabel,
    pub layout: WindowLayout,

    // File inventory. Invariants: files.len() == file_count and
    // the sum of size_bytes == total_bytes.
    pub file_count: usize,
    pub total_bytes: u64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub files: Vec<FileRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_file: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_file: Option<DateTime<Utc>>,

    // Generation facts (from .generation/metadata.yaml).
    pub has_generation_meta: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub generated_by: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tools_used: Vec<String>,

    // Validation facts (from .validation/validation.yaml).
    pub has_validation_meta: bool,

    // Submission facts (from .submission/submission.yaml).
    pub has_submission_meta: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<SubmissionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub submission_id: String,

    /// Content files exist but no marker recorded them (display-only fact;
    /// the formal state stays marker-driven).
    pub has_unmanaged_files: bool,

    /// Non-fatal problems hit while scanning this window.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub degraded: Vec<Degradation>,
}

impl WindowState {
    /// The marker-driven lifecycle state of this window.
    pub fn local_state(&self) -> LocalEvidenceState {
        classify_window(
            self.has_generation_meta,
            self.has_validation_meta,
            if self.has_submission_meta {
                Some(self.submission_status.unwrap_or_default())
            } else {
                None
            },
        )
    }
}

/// Complete evidence state for one task, owned by the scan that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceTaskState {
    pub task_ref: TaskRef,
    pub task_name: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub framework: String,

    /// State of the most relevant window (highest lifecycle rank).
    pub local_state: LocalEvidenceState,
    pub windows: BTreeMap<WindowLabel, WindowState>,

    pub automation_level: AutomationCapability,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub applicable_tools: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_generated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_submitted_at: Option<DateTime<Utc>>,
    pub last_scanned_at: DateTime<Utc>,

    pub has_unmanaged_files: bool,
}

impl EvidenceTaskState {
    /// The most relevant window: highest lifecycle rank, ties broken by the
    /// lexicographically greatest (most recent) label.
    pub fn most_relevant_window(&self) -> Option<&WindowState> {
        self.windows
            .values()
            .max_by_key(|w| (w.local_state().rank(), w.window.clone()))
    }
}
