//! Seams to external collaborators.

use crate::errors::TaskStoreError;
use crate::types::identifiers::TaskRef;
use crate::types::task::TaskDescriptor;

/// External task descriptor storage.
///
/// The engine only reads descriptors; where they come from (vendor API
/// cache, local YAML, a test fixture) is the collaborator's business.
pub trait TaskStore: Send + Sync {
    fn get_task(&self, task_ref: &TaskRef) -> Result<TaskDescriptor, TaskStoreError>;
}
