//! Durable projection of an evaluation result as a validation record.

use std::fs;
use std::path::Path;

use attest_core::errors::EvaluateError;
use attest_core::types::evaluation::{EvaluationResult, EvaluationStatus, IssueSeverity};
use attest_core::types::markers::{
    ValidationCheck, ValidationNote, ValidationRecord, ValidationStatus,
};

const VALIDATION_DIR: &str = ".validation";
const VALIDATION_FILE: &str = "validation.yaml";

/// Write `result` as `.validation/validation.yaml` under `window_dir`.
///
/// The record is a lossy projection: dimension scores become named checks,
/// critical and high issues become errors, medium and low become warnings.
/// Info issues are not carried over.
pub(crate) fn write_validation_record(
    window_dir: &Path,
    result: &EvaluationResult,
    evidence_files: &[String],
) -> Result<(), EvaluateError> {
    let record = project(result, evidence_files);

    let dir = window_dir.join(VALIDATION_DIR);
    let path = dir.join(VALIDATION_FILE);
    fs::create_dir_all(&dir).map_err(|e| EvaluateError::Persist {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let yaml = serde_yaml::to_string(&record).map_err(|e| EvaluateError::Persist {
        path: path.clone(),
        message: e.to_string(),
    })?;
    fs::write(&path, yaml).map_err(|e| EvaluateError::Persist {
        path,
        message: e.to_string(),
    })
}

fn project(result: &EvaluationResult, evidence_files: &[String]) -> ValidationRecord {
    let status = match result.overall_status {
        EvaluationStatus::Pass => ValidationStatus::Passed,
        EvaluationStatus::Warning => ValidationStatus::Warning,
        EvaluationStatus::Fail => ValidationStatus::Failed,
    };

    let checks: Vec<ValidationCheck> = [
        ("completeness", "Completeness", &result.completeness),
        ("requirements_match", "Requirements match", &result.requirements_match),
        ("quality", "Quality", &result.quality),
        ("control_alignment", "Control alignment", &result.control_alignment),
    ]
    .into_iter()
    .map(|(code, name, dim)| ValidationCheck {
        code: code.to_string(),
        name: name.to_string(),
        status: match dim.status {
            EvaluationStatus::Pass => "passed".to_string(),
            EvaluationStatus::Warning => "warning".to_string(),
            EvaluationStatus::Fail => "failed".to_string(),
        },
        severity: match dim.status {
            EvaluationStatus::Pass => "info".to_string(),
            EvaluationStatus::Warning => "warning".to_string(),
            EvaluationStatus::Fail => "error".to_string(),
        },
        message: dim.details.clone(),
    })
    .collect();

    let note = |issue: &attest_core::types::evaluation::EvaluationIssue| ValidationNote {
        code: issue.category.as_str().to_string(),
        message: issue.message.clone(),
        location: issue.location.clone(),
    };
    let errors: Vec<ValidationNote> = result
        .issues
        .iter()
        .filter(|i| matches!(i.severity, IssueSeverity::Critical | IssueSeverity::High))
        .map(note)
        .collect();
    let warnings_list: Vec<ValidationNote> = result
        .issues
        .iter()
        .filter(|i| matches!(i.severity, IssueSeverity::Medium | IssueSeverity::Low))
        .map(note)
        .collect();

    let passed_checks = checks.iter().filter(|c| c.status == "passed").count();
    let failed_checks = checks.iter().filter(|c| c.status == "failed").count();
    let warnings = checks.len() - passed_checks - failed_checks;

    ValidationRecord {
        task_ref: Some(result.task_ref.clone()),
        window: Some(result.window.clone()),
        status,
        validation_mode: "evaluation".to_string(),
        completeness_score: result.overall_score,
        total_checks: checks.len(),
        passed_checks,
        failed_checks,
        warnings,
        errors,
        warnings_list,
        checks,
        evidence_files: evidence_files.to_vec(),
        ready_for_submission: status == ValidationStatus::Passed,
        validation_timestamp: Some(result.evaluated_at),
    }
}
