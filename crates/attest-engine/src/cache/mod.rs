//! In-memory aggregator over scan output. Rebuilt on every invocation;
//! there is no cross-run persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use attest_core::types::identifiers::TaskRef;
use attest_core::types::state::{AutomationCapability, EvidenceTaskState, LocalEvidenceState};
use attest_core::FxHashMap;
use chrono::{DateTime, Utc};

/// Indexes scanner output for fleet-wide summary queries.
///
/// Single-writer, many-reader: insertion goes through one synchronized
/// point; read paths only take the read lock.
pub struct StateCache {
    last_scan: DateTime<Utc>,
    tasks: RwLock<FxHashMap<TaskRef, EvidenceTaskState>>,
}

impl StateCache {
    pub fn new() -> Self {
        Self {
            last_scan: Utc::now(),
            tasks: RwLock::new(FxHashMap::default()),
        }
    }

    /// Build a cache directly from `scan_all` output.
    pub fn from_scan(states: FxHashMap<TaskRef, EvidenceTaskState>) -> Self {
        Self {
            last_scan: Utc::now(),
            tasks: RwLock::new(states),
        }
    }

    /// When this cache was constructed.
    pub fn last_scan(&self) -> DateTime<Utc> {
        self.last_scan
    }

    pub fn len(&self) -> usize {
        self.tasks.read().expect("cache lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace one task's state.
    pub fn set_task(&self, task_ref: TaskRef, state: EvidenceTaskState) {
        self.tasks.write().expect("cache lock").insert(task_ref, state);
    }

    pub fn get_task(&self, task_ref: &TaskRef) -> Option<EvidenceTaskState> {
        self.tasks.read().expect("cache lock").get(task_ref).cloned()
    }

    /// All tasks whose most relevant window sits in the given state.
    pub fn tasks_by_state(&self, state: LocalEvidenceState) -> Vec<EvidenceTaskState> {
        let tasks = self.tasks.read().expect("cache lock");
        let mut matched: Vec<_> = tasks
            .values()
            .filter(|t| t.local_state == state)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.task_ref.cmp(&b.task_ref));
        matched
    }

    pub fn tasks_by_automation(&self, level: AutomationCapability) -> Vec<EvidenceTaskState> {
        let tasks = self.tasks.read().expect("cache lock");
        let mut matched: Vec<_> = tasks
            .values()
            .filter(|t| t.automation_level == level)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.task_ref.cmp(&b.task_ref));
        matched
    }

    /// Task counts keyed by lifecycle state (each task contributes its most
    /// relevant window's state).
    pub fn state_summary(&self) -> BTreeMap<LocalEvidenceState, usize> {
        let tasks = self.tasks.read().expect("cache lock");
        let mut summary = BTreeMap::new();
        for task in tasks.values() {
            *summary.entry(task.local_state).or_insert(0) += 1;
        }
        summary
    }

    /// Task counts keyed by automation capability.
    pub fn automation_summary(&self) -> BTreeMap<AutomationCapability, usize> {
        let tasks = self.tasks.read().expect("cache lock");
        let mut summary = BTreeMap::new();
        for task in tasks.values() {
            *summary.entry(task.automation_level).or_insert(0) += 1;
        }
        summary
    }
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new()
    }
}
