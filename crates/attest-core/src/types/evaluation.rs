//! Evaluation output model: weighted dimension scores, issues, and
//! recommendations for one task/window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::identifiers::{TaskRef, WindowLabel};
use super::state::EvidenceLocation;

/// Overall evaluation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Pass,
    Warning,
    #[default]
    Fail,
}

/// Severity of a single evaluation finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// Which dimension a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Completeness,
    Requirements,
    Quality,
    ControlAlignment,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Requirements => "requirements",
            Self::Quality => "quality",
            Self::ControlAlignment => "control_alignment",
        }
    }
}

/// A specific problem found during evaluation, with a remediation hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationIssue {
    pub severity: IssueSeverity,
    pub category: IssueCategory,
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub location: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub suggestion: String,
}

/// Score for one evaluation dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: f64,
    pub max_score: f64,
    /// Contribution to the overall score; the four weights sum to 1.0.
    pub weight: f64,
    pub status: EvaluationStatus,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub details: String,
}

impl DimensionScore {
    pub fn new(weight: f64) -> Self {
        Self {
            score: 0.0,
            max_score: 100.0,
            weight,
            status: EvaluationStatus::Fail,
            details: String::new(),
        }
    }

    /// Score as a fraction of the maximum, clamped to [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.max_score <= 0.0 {
            return 0.0;
        }
        (self.score / self.max_score).clamp(0.0, 1.0)
    }
}

/// Complete evaluation of one task/window (or one physical subfolder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub task_ref: TaskRef,
    pub window: WindowLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<EvidenceLocation>,

    /// Weighted overall score in [0, 100].
    pub overall_score: f64,
    pub overall_status: EvaluationStatus,

    pub completeness: DimensionScore,
    pub requirements_match: DimensionScore,
    pub quality: DimensionScore,
    pub control_alignment: DimensionScore,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub issues: Vec<EvaluationIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recommendations: Vec<String>,

    pub file_count: usize,
    pub total_bytes: u64,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    pub fn dimensions(&self) -> [&DimensionScore; 4] {
        [
            &self.completeness,
            &self.requirements_match,
            &self.quality,
            &self.control_alignment,
        ]
    }

    pub fn add_issue(
        &mut self,
        severity: IssueSeverity,
        category: IssueCategory,
        message: impl Into<String>,
        location: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.issues.push(EvaluationIssue {
            severity,
            category,
            message: message.into(),
            location: location.into(),
            suggestion: suggestion.into(),
        });
    }

    pub fn issue_count(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}
