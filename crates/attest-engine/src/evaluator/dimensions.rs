//! Per-dimension scoring.
//!
//! The point breakdowns are policy constants; each failing or warning
//! check also emits an issue with a remediation suggestion. A single
//! unparsable or missing input only lowers its owning dimension's score.

use attest_core::types::evaluation::{
    EvaluationResult, EvaluationStatus, IssueCategory, IssueSeverity,
};
use attest_core::types::state::FileRef;
use attest_core::types::task::TaskDescriptor;
use chrono::{DateTime, Utc};

use super::{DIMENSION_PASS_THRESHOLD, DIMENSION_WARN_THRESHOLD};

/// The slice of a window an evaluation looks at, plus the window-level
/// facts that inform completeness.
pub(crate) struct EvidenceView<'a> {
    pub files: Vec<&'a FileRef>,
    pub total_bytes: u64,
    pub has_generation_meta: bool,
    pub newest_file: Option<DateTime<Utc>>,
}

impl EvidenceView<'_> {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

// Completeness points.
const COMPLETENESS_BASE: f64 = 40.0;
const COMPLETENESS_GENERATION_META: f64 = 15.0;
const COMPLETENESS_FILE_COUNT: f64 = 20.0;
const COMPLETENESS_SIZE: f64 = 15.0;
const COMPLETENESS_SIZE_PARTIAL: f64 = 5.0;
const COMPLETENESS_RECENCY: f64 = 10.0;
/// Below this many bytes the window is considered near-empty.
const MIN_MEANINGFUL_BYTES: u64 = 1024;

// Requirements-match points.
const REQUIREMENTS_KEYWORDS: f64 = 40.0;
const REQUIREMENTS_NO_KEYWORDS: f64 = 30.0;
const REQUIREMENTS_GUIDANCE_PRESENT: f64 = 20.0;
const REQUIREMENTS_GUIDANCE_ABSENT: f64 = 30.0;
const REQUIREMENTS_FORMATS: f64 = 30.0;
const REQUIREMENTS_FORMAT_WARN_FRACTION: f64 = 0.5;

// Quality points (four equal checks).
const QUALITY_CHECK: f64 = 25.0;
const QUALITY_CONSOLATION: f64 = 10.0;
const QUALITY_MIN_FILE_BYTES: u64 = 100;
const QUALITY_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;
const QUALITY_MIN_STEM_LEN: usize = 5;

// Control-alignment points.
const CONTROL_BASE: f64 = 30.0;
const CONTROL_COVERAGE: f64 = 40.0;
const CONTROL_MULTI: f64 = 30.0;
const CONTROL_NO_CONTROLS_SCORE: f64 = 70.0;
const CONTROL_COVERAGE_WARN_FRACTION: f64 = 0.3;
/// Control-name words shorter than this carry no signal.
const CONTROL_KEYWORD_MIN_LEN: usize = 5;

/// Keywords that mark a filename as relevant when they appear in the
/// task's name or description.
const COMMON_KEYWORDS: [&str; 13] = [
    "github", "terraform", "access", "permissions", "security", "policy", "control", "users",
    "roles", "audit", "log", "review", "deployment",
];

const STRUCTURED_EXTENSIONS: [&str; 4] = ["csv", "json", "yaml", "xlsx"];
const DOCUMENTATION_EXTENSIONS: [&str; 3] = ["md", "txt", "pdf"];

fn status_for(score: f64) -> EvaluationStatus {
    if score >= DIMENSION_PASS_THRESHOLD {
        EvaluationStatus::Pass
    } else if score >= DIMENSION_WARN_THRESHOLD {
        EvaluationStatus::Warning
    } else {
        EvaluationStatus::Fail
    }
}

fn extension(filename: &str) -> String {
    std::path::Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub(crate) fn score_completeness(
    task: &TaskDescriptor,
    view: &EvidenceView<'_>,
    result: &mut EvaluationResult,
) {
    if view.file_count() == 0 {
        result.completeness.score = 0.0;
        result.completeness.status = EvaluationStatus::Fail;
        result.completeness.details = "No evidence files found".to_string();
        result.add_issue(
            IssueSeverity::Critical,
            IssueCategory::Completeness,
            "No evidence files present",
            "",
            "Upload or generate evidence files",
        );
        return;
    }

    let mut score = COMPLETENESS_BASE;
    let mut details = String::new();

    if view.has_generation_meta {
        score += COMPLETENESS_GENERATION_META;
        details.push_str("Generation metadata present. ");
    } else {
        result.add_issue(
            IssueSeverity::Medium,
            IssueCategory::Completeness,
            "Missing generation metadata",
            ".generation/metadata.yaml",
            "Track how evidence was generated",
        );
    }

    let expected = expected_file_count(task);
    if view.file_count() >= expected {
        score += COMPLETENESS_FILE_COUNT;
        details.push_str(&format!("File count adequate ({} files). ", view.file_count()));
    } else {
        score += view.file_count() as f64 / expected as f64 * COMPLETENESS_FILE_COUNT;
        result.add_issue(
            IssueSeverity::Medium,
            IssueCategory::Completeness,
            format!(
                "File count below expected (found {}, expected ~{})",
                view.file_count(),
                expected
            ),
            "",
            "Ensure all required evidence is collected",
        );
    }

    if view.total_bytes > MIN_MEANINGFUL_BYTES {
        score += COMPLETENESS_SIZE;
    } else {
        score += COMPLETENESS_SIZE_PARTIAL;
        result.add_issue(
            IssueSeverity::Low,
            IssueCategory::Completeness,
            format!("Evidence files very small ({} bytes total)", view.total_bytes),
            "",
            "Ensure evidence contains sufficient detail",
        );
    }

    if view.newest_file.is_some() {
        score += COMPLETENESS_RECENCY;
        details.push_str("Evidence recently updated. ");
    }

    result.completeness.score = score;
    result.completeness.status = status_for(score);
    result.completeness.details = details;
}

/// Expected minimum file count: one file, plus more for control-heavy or
/// long-description tasks.
fn expected_file_count(task: &TaskDescriptor) -> usize {
    let mut expected = match task.linked_controls.len() {
        0..=1 => 1,
        2..=3 => 2,
        _ => 3,
    };
    if task.description.len() > 500 {
        expected += 1;
    }
    expected
}

pub(crate) fn score_requirements(
    task: &TaskDescriptor,
    view: &EvidenceView<'_>,
    result: &mut EvaluationResult,
) {
    let mut score = 0.0;
    let mut details = String::new();

    let keywords = required_keywords(task);
    if keywords.is_empty() {
        score += REQUIREMENTS_NO_KEYWORDS;
        details.push_str("No specific keywords required. ");
    } else if view.file_count() > 0 {
        let matched = view
            .files
            .iter()
            .filter(|f| {
                let name = f.filename.to_lowercase();
                keywords.iter().any(|k| name.contains(k))
            })
            .count();
        score += matched as f64 / view.file_count() as f64 * REQUIREMENTS_KEYWORDS;
        details.push_str(&format!(
            "Filename relevance: {}/{} files match keywords. ",
            matched,
            view.file_count()
        ));
    }

    if task.guidance.is_empty() {
        score += REQUIREMENTS_GUIDANCE_ABSENT;
    } else {
        score += REQUIREMENTS_GUIDANCE_PRESENT;
        details.push_str("Collection guidance present. ");
    }

    let formats = expected_formats(task);
    let format_fraction = if view.file_count() == 0 {
        0.0
    } else {
        view.files
            .iter()
            .filter(|f| formats.contains(&extension(&f.filename)))
            .count() as f64
            / view.file_count() as f64
    };
    score += format_fraction * REQUIREMENTS_FORMATS;
    details.push_str(&format!("File format match: {:.0}%. ", format_fraction * 100.0));

    if format_fraction < REQUIREMENTS_FORMAT_WARN_FRACTION {
        result.add_issue(
            IssueSeverity::Medium,
            IssueCategory::Requirements,
            "Evidence file formats may not match expected types",
            "",
            format!("Consider using formats: {}", formats.join(", ")),
        );
    }

    result.requirements_match.score = score;
    result.requirements_match.status = status_for(score);
    result.requirements_match.details = details;
}

fn required_keywords(task: &TaskDescriptor) -> Vec<&'static str> {
    let text = format!("{} {}", task.name, task.description).to_lowercase();
    COMMON_KEYWORDS
        .into_iter()
        .filter(|k| text.contains(k))
        .collect()
}

fn expected_formats(task: &TaskDescriptor) -> Vec<String> {
    let mut formats = vec!["csv".to_string(), "json".to_string(), "md".to_string()];
    let text = task.description.to_lowercase();
    if text.contains("screenshot") || text.contains("image") {
        formats.extend(["png".to_string(), "jpg".to_string()]);
    }
    if text.contains("report") || text.contains("document") {
        formats.extend(["pdf".to_string(), "docx".to_string()]);
    }
    if text.contains("spreadsheet") || text.contains("table") {
        formats.extend(["xlsx".to_string()]);
    }
    formats
}

pub(crate) fn score_quality(view: &EvidenceView<'_>, result: &mut EvaluationResult) {
    if view.file_count() == 0 {
        result.quality.score = 0.0;
        result.quality.status = EvaluationStatus::Fail;
        return;
    }

    let total = view.file_count() as f64;
    let mut score = 0.0;
    let mut details = String::new();

    let properly_named = view
        .files
        .iter()
        .filter(|f| has_proper_naming(&f.filename))
        .count();
    let naming_score = properly_named as f64 / total * QUALITY_CHECK;
    score += naming_score;
    details.push_str(&format!(
        "Naming conventions: {}/{} files. ",
        properly_named,
        view.file_count()
    ));
    if naming_score < QUALITY_CHECK * 0.6 {
        result.add_issue(
            IssueSeverity::Low,
            IssueCategory::Quality,
            "Some files don't follow naming conventions",
            "",
            "Use descriptive lowercase names with underscores",
        );
    }

    let reasonable_sizes = view
        .files
        .iter()
        .filter(|f| f.size_bytes > QUALITY_MIN_FILE_BYTES && f.size_bytes < QUALITY_MAX_FILE_BYTES)
        .count();
    score += reasonable_sizes as f64 / total * QUALITY_CHECK;

    let structured = view
        .files
        .iter()
        .filter(|f| STRUCTURED_EXTENSIONS.contains(&extension(&f.filename).as_str()))
        .count();
    if structured > 0 {
        score += structured as f64 / total * QUALITY_CHECK;
        details.push_str(&format!(
            "Structured formats: {}/{} files. ",
            structured,
            view.file_count()
        ));
    } else {
        score += QUALITY_CONSOLATION;
        result.add_issue(
            IssueSeverity::Low,
            IssueCategory::Quality,
            "No structured data formats (CSV, JSON, YAML)",
            "",
            "Consider using structured formats for better auditability",
        );
    }

    let has_documentation = view
        .files
        .iter()
        .any(|f| DOCUMENTATION_EXTENSIONS.contains(&extension(&f.filename).as_str()));
    if has_documentation {
        score += QUALITY_CHECK;
        details.push_str("Documentation present. ");
    } else {
        score += QUALITY_CONSOLATION;
        result.add_issue(
            IssueSeverity::Low,
            IssueCategory::Quality,
            "No documentation files found",
            "",
            "Consider adding a summary document or README",
        );
    }

    result.quality.score = score;
    result.quality.status = status_for(score);
    result.quality.details = details;
}

fn has_proper_naming(filename: &str) -> bool {
    let stem = std::path::Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.len() >= QUALITY_MIN_STEM_LEN
        && stem.to_lowercase() == stem
        && !stem.contains(' ')
}

pub(crate) fn score_control_alignment(
    task: &TaskDescriptor,
    view: &EvidenceView<'_>,
    result: &mut EvaluationResult,
) {
    if task.linked_controls.is_empty() {
        result.control_alignment.score = CONTROL_NO_CONTROLS_SCORE;
        result.control_alignment.status = status_for(CONTROL_NO_CONTROLS_SCORE);
        result.control_alignment.details =
            "No specific controls to evaluate against. ".to_string();
        return;
    }

    let mut score = 0.0;
    let mut details = String::new();

    if view.file_count() > 0 {
        score += CONTROL_BASE;
    }

    let keywords = control_keywords(task);
    let coverage = if keywords.is_empty() {
        1.0
    } else {
        let matched = keywords
            .iter()
            .filter(|k| {
                view.files
                    .iter()
                    .any(|f| f.filename.to_lowercase().contains(*k))
            })
            .count();
        matched as f64 / keywords.len() as f64
    };
    score += coverage * CONTROL_COVERAGE;
    details.push_str(&format!("Control keyword coverage: {:.0}%. ", coverage * 100.0));

    if coverage < CONTROL_COVERAGE_WARN_FRACTION {
        result.add_issue(
            IssueSeverity::High,
            IssueCategory::ControlAlignment,
            "Evidence may not adequately address related controls",
            "",
            "Ensure evidence demonstrates control implementation",
        );
    }

    if view.file_count() > 0 {
        score += CONTROL_MULTI;
        details.push_str(&format!("Addresses {} control(s). ", task.linked_controls.len()));
    }

    result.control_alignment.score = score;
    result.control_alignment.status = status_for(score);
    result.control_alignment.details = details;
}

fn control_keywords(task: &TaskDescriptor) -> Vec<String> {
    let mut keywords: Vec<String> = task
        .linked_controls
        .iter()
        .flat_map(|c| {
            c.name
                .to_lowercase()
                .split_whitespace()
                .filter(|w| w.len() >= CONTROL_KEYWORD_MIN_LEN)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    keywords.sort();
    keywords.dedup();
    keywords
}
