//! Shared fixtures: an on-disk evidence tree builder and an in-memory
//! task store.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use attest_core::errors::TaskStoreError;
use attest_core::types::identifiers::TaskRef;
use attest_core::types::task::{AecState, CollectionType, ControlRef, TaskDescriptor};
use attest_core::{EngineConfig, FxHashMap, TaskStore};
use tempfile::TempDir;

/// Task descriptor fixture with sensible defaults.
pub fn descriptor(reference: &str, name: &str) -> TaskDescriptor {
    TaskDescriptor {
        reference: TaskRef::parse(reference),
        name: name.to_string(),
        framework: "SOC2".to_string(),
        description: "Quarterly review of GitHub access permissions for all users".to_string(),
        guidance: "Export the current user list and review roles".to_string(),
        linked_controls: vec![ControlRef {
            reference: "AC-2".to_string(),
            name: "Access Control".to_string(),
        }],
        aec_status: AecState::Disabled,
        collection_type: CollectionType::Manual,
        automation_hints: vec!["github-cli".to_string()],
    }
}

/// In-memory [`TaskStore`] fixture.
#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: FxHashMap<TaskRef, TaskDescriptor>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, reference: &str, task: TaskDescriptor) -> Self {
        self.tasks
            .insert(TaskRef::parse(reference).expect("valid task ref"), task);
        self
    }
}

impl TaskStore for MemoryTaskStore {
    fn get_task(&self, task_ref: &TaskRef) -> Result<TaskDescriptor, TaskStoreError> {
        self.tasks
            .get(task_ref)
            .cloned()
            .ok_or_else(|| TaskStoreError::UnknownTask {
                task_ref: task_ref.to_string(),
            })
    }
}

/// Temporary evidence tree rooted in a tempdir.
pub struct EvidenceTree {
    dir: TempDir,
}

impl EvidenceTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig::new(self.root())
    }

    /// Create a window directory, e.g. `window("ET-0001_Access_Review", "2025-Q1")`.
    pub fn window(&self, task_dir: &str, window: &str) -> PathBuf {
        let path = self.root().join(task_dir).join(window);
        fs::create_dir_all(&path).expect("create window dir");
        path
    }

    pub fn write_file(&self, dir: &Path, name: &str, contents: &[u8]) {
        fs::write(dir.join(name), contents).expect("write file");
    }
}

pub fn write_generation_marker(window_dir: &Path) {
    let dir = window_dir.join(".generation");
    fs::create_dir_all(&dir).expect("create .generation");
    fs::write(
        dir.join("metadata.yaml"),
        "generated_at: \"2025-06-01T12:00:00Z\"\n\
         generated_by: attest\n\
         tools_used:\n  - github-cli\n",
    )
    .expect("write generation marker");
}

pub fn write_validation_marker(window_dir: &Path) {
    let dir = window_dir.join(".validation");
    fs::create_dir_all(&dir).expect("create .validation");
    fs::write(
        dir.join("validation.yaml"),
        "status: passed\nvalidation_mode: evaluation\nready_for_submission: true\n",
    )
    .expect("write validation marker");
}

pub fn write_submission_marker(window_dir: &Path, status: &str) {
    let dir = window_dir.join(".submission");
    fs::create_dir_all(&dir).expect("create .submission");
    fs::write(
        dir.join("submission.yaml"),
        format!(
            "status: {status}\nsubmission_id: SUB-1001\nsubmitted_at: \"2025-06-02T09:00:00Z\"\n"
        ),
    )
    .expect("write submission marker");
}
