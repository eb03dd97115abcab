//! Evaluation orchestration: scan, score, finalize, optionally persist.

use std::sync::Arc;

use attest_core::config::requests::EvaluateRequest;
use attest_core::errors::EvaluateError;
use attest_core::types::evaluation::{
    DimensionScore, EvaluationResult, EvaluationStatus, IssueCategory, IssueSeverity,
};
use attest_core::types::identifiers::{TaskRef, WindowLabel};
use attest_core::types::state::{EvidenceLocation, WindowState};
use attest_core::types::task::TaskDescriptor;
use attest_core::{EngineConfig, TaskStore};
use chrono::Utc;

use super::dimensions::{
    score_completeness, score_control_alignment, score_quality, score_requirements, EvidenceView,
};
use super::{
    persist, OVERALL_FAIL_FLOOR, OVERALL_PASS_THRESHOLD, RECOMMENDATION_THRESHOLD,
    WEIGHT_COMPLETENESS, WEIGHT_CONTROL_ALIGNMENT, WEIGHT_QUALITY, WEIGHT_REQUIREMENTS,
};
use crate::scanner::EvidenceScanner;

/// Locations a whole-window evaluation draws files from. Work-in-progress
/// files are deliberately excluded: they have not been put forward yet.
const EVALUATED_LOCATIONS: [EvidenceLocation; 3] = [
    EvidenceLocation::Root,
    EvidenceLocation::Submitted,
    EvidenceLocation::Archive,
];

/// Scores one task/window against its descriptor across four weighted
/// dimensions. Stateless between calls; every evaluation re-scans.
pub struct EvidenceEvaluator {
    store: Arc<dyn TaskStore>,
    scanner: EvidenceScanner,
}

impl EvidenceEvaluator {
    pub fn new(config: EngineConfig, store: Arc<dyn TaskStore>) -> Self {
        let scanner = EvidenceScanner::new(config, Arc::clone(&store));
        Self { store, scanner }
    }

    /// Evaluate a whole window without persisting.
    pub fn evaluate_window(
        &self,
        task_ref: &TaskRef,
        window: &WindowLabel,
    ) -> Result<EvaluationResult, EvaluateError> {
        self.evaluate(&EvaluateRequest {
            task_ref: task_ref.clone(),
            window: window.clone(),
            subfolder: None,
            persist: false,
        })
    }

    /// Evaluate one physical subfolder of a window without persisting.
    pub fn evaluate_subfolder(
        &self,
        task_ref: &TaskRef,
        window: &WindowLabel,
        subfolder: EvidenceLocation,
    ) -> Result<EvaluationResult, EvaluateError> {
        self.evaluate(&EvaluateRequest {
            task_ref: task_ref.clone(),
            window: window.clone(),
            subfolder: Some(subfolder),
            persist: false,
        })
    }

    /// Evaluate one window (or one physical subfolder of it).
    ///
    /// A missing task descriptor degrades the evaluation rather than
    /// failing it: defaults are scored and an info issue records the gap.
    /// With `persist` set, the result is also written as a validation
    /// record under the window; a persist failure surfaces as
    /// [`EvaluateError::Persist`] after the evaluation itself succeeded.
    pub fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationResult, EvaluateError> {
        let window_state = self
            .scanner
            .scan_window(&request.task_ref, &request.window)?;

        let (descriptor, descriptor_missing) = match self.store.get_task(&request.task_ref) {
            Ok(d) => (d, false),
            Err(e) => {
                tracing::warn!(
                    task_ref = %request.task_ref,
                    error = %e,
                    "task descriptor unavailable, evaluating with defaults"
                );
                (TaskDescriptor::default(), true)
            }
        };

        let view = build_view(&window_state, request.subfolder);
        let mut result = new_result(request, &view);

        if descriptor_missing {
            result.add_issue(
                IssueSeverity::Info,
                IssueCategory::Requirements,
                "Task descriptor unavailable; requirement checks used defaults",
                "",
                "Verify the task exists in the task store",
            );
        }

        score_completeness(&descriptor, &view, &mut result);
        score_requirements(&descriptor, &view, &mut result);
        score_quality(&view, &mut result);
        score_control_alignment(&descriptor, &view, &mut result);

        finalize(&mut result);

        if request.persist {
            let task_dir = self.scanner.find_task_dir(&request.task_ref)?.ok_or_else(|| {
                attest_core::errors::ScanError::TaskNotFound {
                    task_ref: request.task_ref.to_string(),
                }
            })?;
            let window_dir = task_dir.join(request.window.as_str());
            let filenames: Vec<String> =
                view.files.iter().map(|f| f.filename.clone()).collect();
            persist::write_validation_record(&window_dir, &result, &filenames)?;
            tracing::info!(
                task_ref = %request.task_ref,
                window = %request.window,
                score = result.overall_score,
                "validation record persisted"
            );
        }

        Ok(result)
    }
}

fn build_view(window: &WindowState, subfolder: Option<EvidenceLocation>) -> EvidenceView<'_> {
    let files: Vec<_> = window
        .files
        .iter()
        .filter(|f| match subfolder {
            Some(location) => f.location == location,
            None => EVALUATED_LOCATIONS.contains(&f.location),
        })
        .collect();
    let total_bytes = files.iter().map(|f| f.size_bytes).sum();
    let newest_file = files.iter().map(|f| f.modified_at).max();
    EvidenceView {
        files,
        total_bytes,
        has_generation_meta: window.has_generation_meta,
        newest_file,
    }
}

fn new_result(request: &EvaluateRequest, view: &EvidenceView<'_>) -> EvaluationResult {
    EvaluationResult {
        task_ref: request.task_ref.clone(),
        window: request.window.clone(),
        subfolder: request.subfolder,
        overall_score: 0.0,
        overall_status: EvaluationStatus::Fail,
        completeness: DimensionScore::new(WEIGHT_COMPLETENESS),
        requirements_match: DimensionScore::new(WEIGHT_REQUIREMENTS),
        quality: DimensionScore::new(WEIGHT_QUALITY),
        control_alignment: DimensionScore::new(WEIGHT_CONTROL_ALIGNMENT),
        issues: Vec::new(),
        recommendations: Vec::new(),
        file_count: view.file_count(),
        total_bytes: view.total_bytes,
        evaluated_at: Utc::now(),
    }
}

/// Combine dimension scores into the overall verdict and derive
/// recommendations for every weak dimension.
fn finalize(result: &mut EvaluationResult) {
    let overall: f64 = result
        .dimensions()
        .iter()
        .map(|d| d.fraction() * d.weight)
        .sum::<f64>()
        * 100.0;
    result.overall_score = overall;

    let any_critical = result.issue_count(IssueSeverity::Critical) > 0;
    let any_fail = result
        .dimensions()
        .iter()
        .any(|d| d.status == EvaluationStatus::Fail);
    let all_pass = result
        .dimensions()
        .iter()
        .all(|d| d.status == EvaluationStatus::Pass);

    result.overall_status = if any_critical || (any_fail && overall < OVERALL_FAIL_FLOOR) {
        EvaluationStatus::Fail
    } else if overall < OVERALL_PASS_THRESHOLD || !all_pass {
        EvaluationStatus::Warning
    } else {
        EvaluationStatus::Pass
    };

    let weak = [
        (
            result.completeness.score,
            "Add more comprehensive evidence files covering all aspects of the task",
        ),
        (
            result.requirements_match.score,
            "Review the task description and ensure evidence directly addresses it",
        ),
        (
            result.quality.score,
            "Improve file naming and organization; prefer structured formats",
        ),
        (
            result.control_alignment.score,
            "Ensure evidence demonstrates implementation of the linked controls",
        ),
    ];
    for (score, recommendation) in weak {
        if score < RECOMMENDATION_THRESHOLD {
            result.recommendations.push(recommendation.to_string());
        }
    }
}
