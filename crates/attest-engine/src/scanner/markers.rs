//! Metadata marker reading with degrade-don't-abort semantics.

use std::path::Path;

use attest_core::types::markers::{GenerationRecord, SubmissionRecord, ValidationRecord};
use attest_core::types::state::{Degradation, EvidenceLocation};
use serde::de::DeserializeOwned;

pub const GENERATION_DIR: &str = ".generation";
pub const VALIDATION_DIR: &str = ".validation";
pub const SUBMISSION_DIR: &str = ".submission";

/// Marker directories that migrate with their window's content files.
/// `.context/` is shared and never moves.
pub const OWNED_MARKER_DIRS: [&str; 3] = [GENERATION_DIR, VALIDATION_DIR, SUBMISSION_DIR];

/// Search order for markers inside a window: the root first, then the
/// subfolders the files may have been organized into.
pub const MARKER_SEARCH_ORDER: [EvidenceLocation; 5] = [
    EvidenceLocation::Root,
    EvidenceLocation::Ready,
    EvidenceLocation::Submitted,
    EvidenceLocation::Wip,
    EvidenceLocation::Archive,
];

/// Read one YAML marker file if present. An unreadable or unparsable
/// marker is treated as absent: logged, recorded as a degradation, and
/// the remaining signals still drive classification.
fn read_marker<T: DeserializeOwned>(
    dir: &Path,
    marker_dir: &str,
    file_stem: &str,
    degraded: &mut Vec<Degradation>,
) -> Option<T> {
    let base = dir.join(marker_dir);
    let path = ["yaml", "yml"]
        .iter()
        .map(|ext| base.join(format!("{file_stem}.{ext}")))
        .find(|p| p.is_file())?;

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable marker treated as absent");
            degraded.push(Degradation {
                location: format!("{marker_dir}/{file_stem}"),
                reason: format!("unreadable marker: {e}"),
            });
            return None;
        }
    };

    match serde_yaml::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unparsable marker treated as absent");
            degraded.push(Degradation {
                location: format!("{marker_dir}/{file_stem}"),
                reason: format!("unparsable marker: {e}"),
            });
            None
        }
    }
}

pub fn read_generation(dir: &Path, degraded: &mut Vec<Degradation>) -> Option<GenerationRecord> {
    read_marker(dir, GENERATION_DIR, "metadata", degraded)
}

pub fn read_validation(dir: &Path, degraded: &mut Vec<Degradation>) -> Option<ValidationRecord> {
    read_marker(dir, VALIDATION_DIR, "validation", degraded)
}

pub fn read_submission(dir: &Path, degraded: &mut Vec<Degradation>) -> Option<SubmissionRecord> {
    read_marker(dir, SUBMISSION_DIR, "submission", degraded)
}
