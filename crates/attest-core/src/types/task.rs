//! External task descriptor: what the storage collaborator knows about a
//! task, independent of anything on disk.

use serde::{Deserialize, Serialize};

use super::identifiers::TaskRef;
use super::state::AutomationCapability;

/// Automated Evidence Collection status reported by the vendor system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AecState {
    Enabled,
    Disabled,
    #[default]
    Unknown,
}

/// How the vendor expects evidence for this task to be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionType {
    Manual,
    Automated,
    Hybrid,
    #[default]
    Unknown,
}

/// One linked control: an obligation the evidence must demonstrate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControlRef {
    pub reference: String,
    pub name: String,
}

/// Task descriptor supplied by the external storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaskDescriptor {
    pub reference: Option<TaskRef>,
    pub name: String,
    pub framework: String,
    pub description: String,
    pub guidance: String,
    pub linked_controls: Vec<ControlRef>,
    pub aec_status: AecState,
    pub collection_type: CollectionType,
    /// Tool names the collaborator considers applicable to this task.
    pub automation_hints: Vec<String>,
}

impl AutomationCapability {
    /// Derive the automation level from descriptor facts alone.
    ///
    /// AEC enabled means the vendor collects without this tool: fully
    /// automated unless the task is flagged hybrid. AEC disabled means
    /// only manual collection happens today. Without an AEC signal the
    /// collection type is the best available hint.
    pub fn derive(aec: AecState, collection: CollectionType) -> Self {
        match (aec, collection) {
            (AecState::Enabled, CollectionType::Hybrid) => Self::Partially,
            (AecState::Enabled, _) => Self::Fully,
            (AecState::Disabled, _) => Self::Manual,
            (AecState::Unknown, CollectionType::Automated | CollectionType::Hybrid) => {
                Self::Partially
            }
            (AecState::Unknown, CollectionType::Manual) => Self::Manual,
            (AecState::Unknown, CollectionType::Unknown) => Self::Unknown,
        }
    }
}
