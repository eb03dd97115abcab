//! Idempotent reorganizer for the legacy flat window layout.
//!
//! A flat window keeps its content files loose at the window root. Cleanup
//! moves them, together with the marker directories that belong to the
//! window, into the subfolder matching the window's lifecycle state:
//! generation-only windows go to `wip/`, validated windows to `ready/`,
//! anything with a submission marker to `submitted/`, and windows with no
//! markers at all to `wip/`. Pinned plan files and the shared `.context/`
//! directory never move. Running cleanup on an already-structured window
//! is a no-op, so repeated runs converge.

use std::fs;
use std::path::{Path, PathBuf};

use attest_core::config::requests::CleanupRequest;
use attest_core::errors::CleanupError;
use attest_core::types::cleanup::{CleanupResult, CleanupSummary};
use attest_core::types::identifiers::{TaskRef, WindowLabel};
use attest_core::types::state::{classify_window, EvidenceLocation, LocalEvidenceState};
use attest_core::EngineConfig;

use crate::scanner::markers::{self, OWNED_MARKER_DIRS};
use crate::scanner::window::is_pinned_root_file;
use crate::scanner::{find_task_dir_in, ScanCancellation};

/// Reorganizes flat windows into the structured layout.
pub struct EvidenceCleanup {
    config: EngineConfig,
}

impl EvidenceCleanup {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Dispatch a cleanup request: one window, one task, or the whole
    /// evidence tree. Cancellation is polled between tasks; a cancelled
    /// run returns the partial summary.
    pub fn cleanup(
        &self,
        request: &CleanupRequest,
        cancel: &ScanCancellation,
    ) -> Result<CleanupSummary, CleanupError> {
        match (&request.task_ref, &request.window) {
            (Some(task_ref), Some(window)) => {
                let result = self.cleanup_window(task_ref, window, request.dry_run)?;
                let mut summary = CleanupSummary {
                    total_tasks: 1,
                    total_windows: 1,
                    ..CleanupSummary::default()
                };
                fold_result(&mut summary, result);
                Ok(summary)
            }
            (Some(task_ref), None) => {
                let task_dir = self.require_task_dir(task_ref)?;
                let mut summary = CleanupSummary {
                    total_tasks: 1,
                    ..CleanupSummary::default()
                };
                self.cleanup_task_dir(task_ref, &task_dir, request.dry_run, &mut summary)?;
                Ok(summary)
            }
            (None, _) => self.cleanup_all(request.dry_run, cancel),
        }
    }

    /// Reorganize one window. Fails hard when the task or window directory
    /// is absent; per-file move failures are collected in the result.
    pub fn cleanup_window(
        &self,
        task_ref: &TaskRef,
        window: &WindowLabel,
        dry_run: bool,
    ) -> Result<CleanupResult, CleanupError> {
        let task_dir = self.require_task_dir(task_ref)?;
        let window_dir = task_dir.join(window.as_str());
        if !window_dir.is_dir() {
            return Err(attest_core::errors::ScanError::WindowNotFound {
                task_ref: task_ref.to_string(),
                window: window.to_string(),
            }
            .into());
        }
        cleanup_window_dir(task_ref, window, &window_dir, dry_run)
    }

    /// Reorganize every flat window of every task under the evidence root.
    pub fn cleanup_all(
        &self,
        dry_run: bool,
        cancel: &ScanCancellation,
    ) -> Result<CleanupSummary, CleanupError> {
        let mut summary = CleanupSummary::default();
        let root = &self.config.evidence_dir;
        if !root.is_dir() {
            tracing::warn!(directory = %root.display(), "evidence directory does not exist");
            return Ok(summary);
        }

        let entries = fs::read_dir(root).map_err(|e| CleanupError::Io {
            path: root.clone(),
            source: e,
        })?;
        let mut task_dirs: Vec<(TaskRef, PathBuf)> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                TaskRef::from_dir_name(&name).map(|r| (r, e.path()))
            })
            .collect();
        task_dirs.sort_by(|a, b| a.0.cmp(&b.0));

        for (task_ref, task_dir) in &task_dirs {
            if cancel.is_cancelled() {
                tracing::info!("cleanup cancelled, returning partial summary");
                break;
            }
            summary.total_tasks += 1;
            self.cleanup_task_dir(task_ref, task_dir, dry_run, &mut summary)?;
        }

        tracing::info!(
            tasks = summary.total_tasks,
            windows_cleaned = summary.windows_cleaned,
            files_organized = summary.files_organized,
            dry_run,
            "cleanup complete"
        );
        Ok(summary)
    }

    fn cleanup_task_dir(
        &self,
        task_ref: &TaskRef,
        task_dir: &Path,
        dry_run: bool,
        summary: &mut CleanupSummary,
    ) -> Result<(), CleanupError> {
        let entries = fs::read_dir(task_dir).map_err(|e| CleanupError::Io {
            path: task_dir.to_path_buf(),
            source: e,
        })?;
        let mut windows: Vec<(WindowLabel, PathBuf)> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                WindowLabel::parse(&name).map(|w| (w, e.path()))
            })
            .collect();
        windows.sort_by(|a, b| a.0.cmp(&b.0));

        for (window, window_dir) in windows {
            summary.total_windows += 1;
            match cleanup_window_dir(task_ref, &window, &window_dir, dry_run) {
                Ok(result) => fold_result(summary, result),
                Err(e) => {
                    tracing::warn!(
                        task_ref = %task_ref,
                        window = %window,
                        error = %e,
                        "window cleanup failed, continuing"
                    );
                    summary.errors.push(format!("{task_ref}/{window}: {e}"));
                }
            }
        }
        Ok(())
    }

    fn require_task_dir(&self, task_ref: &TaskRef) -> Result<PathBuf, CleanupError> {
        find_task_dir_in(&self.config.evidence_dir, task_ref)?.ok_or_else(|| {
            attest_core::errors::ScanError::TaskNotFound {
                task_ref: task_ref.to_string(),
            }
            .into()
        })
    }
}

fn fold_result(summary: &mut CleanupSummary, result: CleanupResult) {
    if result.was_flat_structure {
        summary.windows_cleaned += 1;
        summary.files_organized += result.total_files_organized();
        summary.results.push(result);
    }
}

/// Destination subfolder for a window's content, by lifecycle state.
/// Unmanaged content (no markers at all) is treated as work in progress.
fn destination_for(state: LocalEvidenceState) -> EvidenceLocation {
    match state {
        LocalEvidenceState::Submitted
        | LocalEvidenceState::Accepted
        | LocalEvidenceState::Rejected => EvidenceLocation::Submitted,
        LocalEvidenceState::Validated => EvidenceLocation::Ready,
        LocalEvidenceState::Generated | LocalEvidenceState::NoEvidence => EvidenceLocation::Wip,
    }
}

fn cleanup_window_dir(
    task_ref: &TaskRef,
    window: &WindowLabel,
    window_dir: &Path,
    dry_run: bool,
) -> Result<CleanupResult, CleanupError> {
    let mut result = CleanupResult::new(task_ref.clone(), window.clone());

    // Loose content at the root, excluding pinned plan files, is what
    // makes a window flat and is exactly what moves.
    let entries = fs::read_dir(window_dir).map_err(|e| CleanupError::Io {
        path: window_dir.to_path_buf(),
        source: e,
    })?;
    let mut loose: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let path = e.path();
            (!name.starts_with('.') && path.is_file() && !is_pinned_root_file(&name))
                .then_some((name, path))
        })
        .collect();
    loose.sort();

    if loose.is_empty() {
        return Ok(result);
    }
    result.was_flat_structure = true;

    let mut degraded = Vec::new();
    let state = classify_window(
        markers::read_generation(window_dir, &mut degraded).is_some(),
        markers::read_validation(window_dir, &mut degraded).is_some(),
        markers::read_submission(window_dir, &mut degraded).map(|s| s.status),
    );
    let destination = destination_for(state);
    let dest_name = destination.dir_name().expect("content destination");
    let dest_dir = window_dir.join(dest_name);

    if !dry_run {
        fs::create_dir_all(&dest_dir).map_err(|e| CleanupError::Io {
            path: dest_dir.clone(),
            source: e,
        })?;
    }

    for (name, path) in loose {
        let target = dest_dir.join(&name);
        if target.exists() {
            result
                .errors
                .push(format!("{name}: destination {dest_name}/{name} already exists"));
            continue;
        }
        if !dry_run {
            if let Err(e) = fs::rename(&path, &target) {
                result.errors.push(format!("{name}: {e}"));
                continue;
            }
        }
        *result.files_organized.entry(destination).or_insert(0) += 1;
    }

    // Marker directories travel with their content. `.context/` is shared
    // between windows' tooling and stays at the root.
    for marker in OWNED_MARKER_DIRS {
        let source = window_dir.join(marker);
        if !source.is_dir() {
            continue;
        }
        let target = dest_dir.join(marker);
        if target.exists() {
            result
                .errors
                .push(format!("{marker}: destination {dest_name}/{marker} already exists"));
            continue;
        }
        if !dry_run {
            if let Err(e) = fs::rename(&source, &target) {
                result.errors.push(format!("{marker}: {e}"));
                continue;
            }
        }
        result.metadata_moved.push(marker.to_string());
    }

    tracing::debug!(
        task_ref = %task_ref,
        window = %window,
        destination = dest_name,
        files = result.total_files_organized(),
        dry_run,
        "window reorganized"
    );
    Ok(result)
}
