//! Top-level scanner orchestrating the task-directory walk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use attest_core::errors::ScanError;
use attest_core::types::identifiers::{task_name_from_dir, TaskRef, WindowLabel};
use attest_core::types::state::{AutomationCapability, EvidenceTaskState, WindowState};
use attest_core::{EngineConfig, FxHashMap, TaskStore};
use chrono::Utc;
use rayon::prelude::*;

use super::cancellation::ScanCancellation;
use super::window::scan_window_dir;

/// Walks the evidence tree and rebuilds [`EvidenceTaskState`] from
/// filesystem signals. Every scan starts from scratch; nothing is mutated
/// incrementally.
pub struct EvidenceScanner {
    config: EngineConfig,
    store: Arc<dyn TaskStore>,
}

impl EvidenceScanner {
    pub fn new(config: EngineConfig, store: Arc<dyn TaskStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scan every task directory under the evidence root.
    ///
    /// Task scans are independent and run on a bounded worker pool; results
    /// funnel through a single collection point. A missing evidence root
    /// yields an empty map. A failed task scan is logged and skipped.
    /// Cancellation is polled per task directory; a cancelled scan returns
    /// the partial map.
    pub fn scan_all(
        &self,
        cancel: &ScanCancellation,
    ) -> Result<FxHashMap<TaskRef, EvidenceTaskState>, ScanError> {
        let root = &self.config.evidence_dir;
        if !root.is_dir() {
            tracing::warn!(directory = %root.display(), "evidence directory does not exist");
            return Ok(FxHashMap::default());
        }

        let entries = fs::read_dir(root).map_err(|e| ScanError::Io {
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

        let scan = |dirs: &[(TaskRef, PathBuf)]| {
            dirs.par_iter()
                .filter_map(|(task_ref, dir)| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    match self.scan_task_dir(task_ref, dir) {
                        Ok(state) => Some((task_ref.clone(), state)),
                        Err(e) => {
                            tracing::warn!(task_ref = %task_ref, error = %e, "task scan failed, skipping");
                            None
                        }
                    }
                })
                .collect::<Vec<_>>()
        };

        let threads = self.config.effective_threads();
        let results = if threads > 0 {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| scan(&task_dirs)),
                Err(e) => {
                    tracing::warn!(error = %e, "falling back to the global thread pool");
                    scan(&task_dirs)
                }
            }
        } else {
            scan(&task_dirs)
        };

        let states: FxHashMap<_, _> = results.into_iter().collect();
        tracing::info!(tasks_found = states.len(), "evidence scan complete");
        Ok(states)
    }

    /// Scan one task. Fails with `TaskNotFound` if its directory is absent.
    pub fn scan_task(&self, task_ref: &TaskRef) -> Result<EvidenceTaskState, ScanError> {
        let dir = self
            .find_task_dir(task_ref)?
            .ok_or_else(|| ScanError::TaskNotFound {
                task_ref: task_ref.to_string(),
            })?;
        self.scan_task_dir(task_ref, &dir)
    }

    /// Scan one window of one task. Fails with `WindowNotFound` if the
    /// window directory is absent.
    pub fn scan_window(
        &self,
        task_ref: &TaskRef,
        window: &WindowLabel,
    ) -> Result<WindowState, ScanError> {
        let task_dir = self
            .find_task_dir(task_ref)?
            .ok_or_else(|| ScanError::TaskNotFound {
                task_ref: task_ref.to_string(),
            })?;
        let window_dir = task_dir.join(window.as_str());
        if !window_dir.is_dir() {
            return Err(ScanError::WindowNotFound {
                task_ref: task_ref.to_string(),
                window: window.to_string(),
            });
        }
        scan_window_dir(window, &window_dir, &self.config)
    }

    /// Locate the directory for a task reference (`ET-0001_` prefix match).
    pub fn find_task_dir(&self, task_ref: &TaskRef) -> Result<Option<PathBuf>, ScanError> {
        find_task_dir_in(&self.config.evidence_dir, task_ref)
    }

    fn scan_task_dir(
        &self,
        task_ref: &TaskRef,
        task_dir: &PathBuf,
    ) -> Result<EvidenceTaskState, ScanError> {
        let entries = fs::read_dir(task_dir).map_err(|e| ScanError::Io {
            path: task_dir.clone(),
            source: e,
        })?;

        let mut windows: BTreeMap<WindowLabel, WindowState> = BTreeMap::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry.path().is_dir() {
                continue;
            }
            let Some(window) = WindowLabel::parse(&name) else {
                continue; // not a window directory
            };
            match scan_window_dir(&window, &entry.path(), &self.config) {
                Ok(state) => {
                    windows.insert(window, state);
                }
                Err(e) => {
                    tracing::warn!(task_ref = %task_ref, window = %window, error = %e, "window scan failed, skipping");
                }
            }
        }

        // Descriptor lookup is best-effort: a failure degrades automation
        // to Unknown and leaves naming to the directory convention.
        let descriptor = match self.store.get_task(task_ref) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(task_ref = %task_ref, error = %e, "task descriptor lookup failed");
                None
            }
        };

        let dir_name = task_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let task_name = descriptor
            .as_ref()
            .filter(|d| !d.name.is_empty())
            .map(|d| d.name.clone())
            .or_else(|| task_name_from_dir(&dir_name))
            .unwrap_or_default();

        let automation_level = descriptor
            .as_ref()
            .map(|d| AutomationCapability::derive(d.aec_status, d.collection_type))
            .unwrap_or(AutomationCapability::Unknown);

        let mut applicable_tools: Vec<String> = descriptor
            .as_ref()
            .map(|d| d.automation_hints.clone())
            .unwrap_or_default();
        for window in windows.values() {
            applicable_tools.extend(window.tools_used.iter().cloned());
        }
        applicable_tools.sort();
        applicable_tools.dedup();

        let local_state = windows
            .values()
            .map(|w| w.local_state())
            .max()
            .unwrap_or_default();

        Ok(EvidenceTaskState {
            task_ref: task_ref.clone(),
            task_name,
            framework: descriptor.as_ref().map(|d| d.framework.clone()).unwrap_or_default(),
            local_state,
            last_generated_at: windows.values().filter_map(|w| w.generated_at).max(),
            last_submitted_at: windows.values().filter_map(|w| w.submitted_at).max(),
            last_scanned_at: Utc::now(),
            has_unmanaged_files: windows.values().any(|w| w.has_unmanaged_files),
            automation_level,
            applicable_tools,
            windows,
        })
    }
}

/// Locate a task directory under `root` by its `ET-NNNN_` prefix.
/// A missing root is treated as "not found", not an error.
pub(crate) fn find_task_dir_in(
    root: &Path,
    task_ref: &TaskRef,
) -> Result<Option<PathBuf>, ScanError> {
    let entries = match fs::read_dir(root) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ScanError::Io {
                path: root.to_path_buf(),
                source: e,
            })
        }
    };
    let prefix = task_ref.dir_prefix();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&prefix) && entry.path().is_dir() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}
