//! Single-window scan: file inventory, layout detection, and marker facts.

use std::fs;
use std::path::Path;

use attest_core::types::identifiers::WindowLabel;
use attest_core::types::state::{Degradation, EvidenceLocation, WindowLayout, WindowState};
use attest_core::EngineConfig;
use attest_core::errors::ScanError;

use super::file_ref::build_file_ref;
use super::markers;

/// Files that always live at the window root and are never treated as
/// loose evidence for layout purposes.
pub(crate) const PINNED_ROOT_FILES: [&str; 2] =
    ["collection_plan.md", "collection_plan_metadata.yaml"];

/// Subfolders content may be organized into, in layout-priority order.
pub(crate) const CONTENT_SUBFOLDERS: [EvidenceLocation; 4] = [
    EvidenceLocation::Submitted,
    EvidenceLocation::Ready,
    EvidenceLocation::Wip,
    EvidenceLocation::Archive,
];

pub(crate) fn is_pinned_root_file(name: &str) -> bool {
    PINNED_ROOT_FILES.contains(&name)
}

/// Scan one window directory into a [`WindowState`].
///
/// Fails only if the window directory itself cannot be enumerated; every
/// lesser problem becomes a degradation entry.
pub(crate) fn scan_window_dir(
    window: &WindowLabel,
    window_dir: &Path,
    config: &EngineConfig,
) -> Result<WindowState, ScanError> {
    let mut state = WindowState {
        window: window.clone(),
        ..WindowState::default()
    };
    let mut degraded = Vec::new();

    // Inventory: loose root files, then each content subfolder.
    let mut files = Vec::new();
    let mut loose_at_root = false;

    let entries = fs::read_dir(window_dir).map_err(|e| ScanError::Io {
        path: window_dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue; // metadata and hidden entries are never content
        }
        let path = entry.path();
        if path.is_dir() {
            continue; // subfolders handled below
        }
        if let Some(file) =
            build_file_ref(&path, EvidenceLocation::Root, config, &mut degraded)
        {
            if !is_pinned_root_file(&file.filename) {
                loose_at_root = true;
            }
            files.push(file);
        }
    }

    for location in CONTENT_SUBFOLDERS {
        let sub = window_dir.join(location.dir_name().expect("content subfolder"));
        if !sub.is_dir() {
            continue;
        }
        match fs::read_dir(&sub) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if name.starts_with('.') {
                        continue;
                    }
                    let path = entry.path();
                    if path.is_dir() {
                        continue;
                    }
                    if let Some(file) = build_file_ref(&path, location, config, &mut degraded) {
                        files.push(file);
                    }
                }
            }
            Err(e) => degraded.push(Degradation {
                location: location.dir_name().unwrap_or_default().to_string(),
                reason: format!("unreadable subfolder: {e}"),
            }),
        }
    }

    files.sort_by(|a, b| (a.location, &a.filename).cmp(&(b.location, &b.filename)));

    state.file_count = files.len();
    state.total_bytes = files.iter().map(|f| f.size_bytes).sum();
    state.newest_file = files.iter().map(|f| f.modified_at).max();
    state.oldest_file = files.iter().map(|f| f.modified_at).min();

    state.layout = detect_layout(&files, loose_at_root, window_dir);

    // Markers: the root first, then organized subfolders; first hit wins.
    let marker_dirs: Vec<_> = markers::MARKER_SEARCH_ORDER
        .iter()
        .map(|loc| match loc.dir_name() {
            Some(d) => window_dir.join(d),
            None => window_dir.to_path_buf(),
        })
        .collect();

    for dir in &marker_dirs {
        if let Some(generation) = markers::read_generation(dir, &mut degraded) {
            state.has_generation_meta = true;
            state.generated_at = generation.generated_at;
            state.generated_by = generation.generated_by;
            state.tools_used = generation.tools_used;
            break;
        }
        // Presence without a readable payload still counts for nothing:
        // classification is driven by parsed markers only.
    }
    for dir in &marker_dirs {
        if markers::read_validation(dir, &mut degraded).is_some() {
            state.has_validation_meta = true;
            break;
        }
    }
    for dir in &marker_dirs {
        if let Some(submission) = markers::read_submission(dir, &mut degraded) {
            state.has_submission_meta = true;
            state.submission_status = Some(submission.status);
            state.submitted_at = submission.submitted_at;
            state.submission_id = submission.submission_id;
            break;
        }
    }

    // Pinned plan files are tracked by the collection workflow and never
    // count as unmanaged evidence.
    let content_files = files
        .iter()
        .filter(|f| f.location != EvidenceLocation::Root || !is_pinned_root_file(&f.filename))
        .count();
    state.has_unmanaged_files = content_files > 0
        && !state.has_generation_meta
        && !state.has_validation_meta
        && !state.has_submission_meta;

    state.files = files;
    state.degraded = degraded;
    Ok(state)
}

/// Layout tag: any loose root content makes the window flat; otherwise the
/// highest-priority populated subfolder names it; an empty window is flat.
fn detect_layout(
    files: &[attest_core::types::state::FileRef],
    loose_at_root: bool,
    window_dir: &Path,
) -> WindowLayout {
    if loose_at_root {
        return WindowLayout::Flat;
    }
    for location in CONTENT_SUBFOLDERS {
        let populated = files.iter().any(|f| f.location == location)
            || location
                .dir_name()
                .is_some_and(|d| window_dir.join(d).is_dir());
        if populated {
            return match location {
                EvidenceLocation::Submitted => WindowLayout::Submitted,
                EvidenceLocation::Ready => WindowLayout::Ready,
                EvidenceLocation::Wip => WindowLayout::Wip,
                EvidenceLocation::Archive => WindowLayout::Archive,
                EvidenceLocation::Root => WindowLayout::Flat,
            };
        }
    }
    WindowLayout::Flat
}
