//! Metadata marker payloads: the small YAML files under `.generation/`,
//! `.validation/`, and `.submission/` that record lifecycle transitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{TaskRef, WindowLabel};
use super::state::SubmissionStatus;

/// `.generation/metadata.yaml` — how the evidence files were produced.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GenerationRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    pub generated_by: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub generation_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<TaskRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files_generated: Vec<GeneratedFile>,
}

/// One file listed in a generation record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneratedFile {
    pub path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum: String,
    pub size_bytes: u64,
}

/// `.submission/submission.yaml` — the fact that evidence left this tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SubmissionRecord {
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub submission_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// `.validation/validation.yaml` — durable projection of an evaluation,
/// consulted later to gate submission.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationRecord {
    pub task_ref: Option<TaskRef>,
    pub window: Option<WindowLabel>,
    pub status: ValidationStatus,
    pub validation_mode: String,
    pub completeness_score: f64,
    pub total_checks: usize,
    pub passed_checks: usize,
    pub failed_checks: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationNote>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings_list: Vec<ValidationNote>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<ValidationCheck>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evidence_files: Vec<String>,
    pub ready_for_submission: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Passed,
    Warning,
    #[default]
    Failed,
}

/// One error or warning carried in a validation record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationNote {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub location: String,
}

/// One named check carried in a validation record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationCheck {
    pub code: String,
    pub name: String,
    pub status: String,
    pub severity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}
