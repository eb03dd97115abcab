//! StateCache integration tests: scan-to-summary round trip and
//! concurrent readers.

mod common;

use std::sync::Arc;
use std::thread;

use attest_core::types::identifiers::TaskRef;
use attest_core::types::state::{AutomationCapability, LocalEvidenceState};
use attest_engine::scanner::{EvidenceScanner, ScanCancellation};
use attest_engine::StateCache;

use common::{
    descriptor, write_generation_marker, write_submission_marker, write_validation_marker,
    EvidenceTree, MemoryTaskStore,
};

fn populated_cache() -> StateCache {
    let tree = EvidenceTree::new();
    write_generation_marker(&tree.window("ET-0001_A", "2025"));
    let validated = tree.window("ET-0002_B", "2025");
    write_generation_marker(&validated);
    write_validation_marker(&validated);
    write_submission_marker(&tree.window("ET-0003_C", "2025"), "accepted");
    tree.window("ET-0004_D", "2025");

    let store = MemoryTaskStore::new()
        .with_task("ET-0001", descriptor("ET-0001", "A"))
        .with_task("ET-0002", descriptor("ET-0002", "B"));
    let scanner = EvidenceScanner::new(tree.config(), Arc::new(store));
    StateCache::from_scan(scanner.scan_all(&ScanCancellation::new()).unwrap())
}

#[test]
fn state_summary_counts_most_relevant_windows() {
    let cache = populated_cache();
    assert_eq!(cache.len(), 4);

    let summary = cache.state_summary();
    assert_eq!(summary[&LocalEvidenceState::Generated], 1);
    assert_eq!(summary[&LocalEvidenceState::Validated], 1);
    assert_eq!(summary[&LocalEvidenceState::Accepted], 1);
    assert_eq!(summary[&LocalEvidenceState::NoEvidence], 1);
    assert_eq!(summary.values().sum::<usize>(), cache.len());
}

#[test]
fn automation_summary_reflects_descriptors() {
    let cache = populated_cache();
    let summary = cache.automation_summary();
    // Two tasks have descriptors (manual collection); two have none.
    assert_eq!(summary[&AutomationCapability::Manual], 2);
    assert_eq!(summary[&AutomationCapability::Unknown], 2);
}

#[test]
fn filtered_queries_are_sorted_by_task_ref() {
    let cache = populated_cache();
    let manual = cache.tasks_by_automation(AutomationCapability::Manual);
    let refs: Vec<&str> = manual.iter().map(|t| t.task_ref.as_str()).collect();
    assert_eq!(refs, vec!["ET-0001", "ET-0002"]);

    let validated = cache.tasks_by_state(LocalEvidenceState::Validated);
    assert_eq!(validated.len(), 1);
    assert_eq!(validated[0].task_ref.as_str(), "ET-0002");
}

#[test]
fn set_task_replaces_existing_state() {
    let cache = populated_cache();
    let task_ref = TaskRef::parse("ET-0001").unwrap();
    let mut state = cache.get_task(&task_ref).unwrap();
    assert_eq!(state.local_state, LocalEvidenceState::Generated);

    state.local_state = LocalEvidenceState::Submitted;
    cache.set_task(task_ref.clone(), state);

    assert_eq!(cache.len(), 4);
    assert_eq!(
        cache.get_task(&task_ref).unwrap().local_state,
        LocalEvidenceState::Submitted
    );
}

#[test]
fn concurrent_readers_see_consistent_counts() {
    let cache = Arc::new(populated_cache());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(cache.len(), 4);
                    assert_eq!(cache.state_summary().values().sum::<usize>(), 4);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("reader thread");
    }
}
