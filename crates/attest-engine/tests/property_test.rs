//! Property tests over randomized evidence trees: scan inventory
//! invariants and cleanup convergence.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use attest_core::types::identifiers::{TaskRef, WindowLabel};
use attest_engine::scanner::EvidenceScanner;
use attest_engine::EvidenceCleanup;
use proptest::prelude::*;

use common::{
    write_generation_marker, write_submission_marker, write_validation_marker, EvidenceTree,
    MemoryTaskStore,
};

/// Distinct evidence filenames: lowercase stems, no collisions with the
/// pinned plan files or the structured subfolder names.
fn filenames() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{3,10}_[a-z]{3,10}\\.(csv|json|md|txt)", 0..6)
        .prop_map(|set| {
            set.into_iter()
                .filter(|n| n != "collection_plan.md")
                .collect()
        })
}

fn marker_combo() -> impl Strategy<Value = (bool, bool, Option<&'static str>)> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::option::of(prop::sample::select(vec![
            "submitted",
            "accepted",
            "rejected",
            "draft",
        ])),
    )
}

fn build_window(
    tree: &EvidenceTree,
    names: &[String],
    contents: &BTreeMap<String, Vec<u8>>,
    markers: (bool, bool, Option<&str>),
) -> std::path::PathBuf {
    let window = tree.window("ET-0001_Fixture", "2025-Q1");
    for name in names {
        tree.write_file(&window, name, &contents[name]);
    }
    let (generation, validation, submission) = markers;
    if generation {
        write_generation_marker(&window);
    }
    if validation {
        write_validation_marker(&window);
    }
    if let Some(status) = submission {
        write_submission_marker(&window, status);
    }
    window
}

fn contents_for(names: &[String]) -> BTreeMap<String, Vec<u8>> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.clone(), vec![b'x'; (i + 1) * 37]))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The scanned inventory always agrees with what is actually on disk,
    /// whatever combination of files and markers exists.
    #[test]
    fn scan_inventory_matches_disk(names in filenames(), markers in marker_combo()) {
        let tree = EvidenceTree::new();
        let contents = contents_for(&names);
        build_window(&tree, &names, &contents, markers);

        let scanner = EvidenceScanner::new(tree.config(), Arc::new(MemoryTaskStore::new()));
        let state = scanner
            .scan_task(&TaskRef::parse("ET-0001").unwrap())
            .unwrap();
        let window = &state.windows[&WindowLabel::parse("2025-Q1").unwrap()];

        prop_assert_eq!(window.file_count, names.len());
        prop_assert_eq!(window.files.len(), window.file_count);
        let expected_bytes: u64 = contents.values().map(|c| c.len() as u64).sum();
        prop_assert_eq!(window.total_bytes, expected_bytes);

        // Inventory order is deterministic: sorted by filename at the root.
        let scanned: Vec<&str> = window.files.iter().map(|f| f.filename.as_str()).collect();
        let mut sorted = scanned.clone();
        sorted.sort_unstable();
        prop_assert_eq!(scanned, sorted);

        let expected_state = attest_core::types::state::classify_window(
            markers.0,
            markers.1,
            markers.2.map(|_| window.submission_status.unwrap()),
        );
        prop_assert_eq!(state.local_state, expected_state);
    }

    /// Cleanup always converges: after one pass no loose content remains,
    /// every file survives in exactly one subfolder, and a second pass is
    /// a no-op.
    #[test]
    fn cleanup_converges_in_one_pass(names in filenames(), markers in marker_combo()) {
        let tree = EvidenceTree::new();
        let contents = contents_for(&names);
        let window = build_window(&tree, &names, &contents, markers);

        let cleanup = EvidenceCleanup::new(tree.config());
        let task_ref = TaskRef::parse("ET-0001").unwrap();
        let label = WindowLabel::parse("2025-Q1").unwrap();

        let first = cleanup.cleanup_window(&task_ref, &label, false).unwrap();
        prop_assert_eq!(first.was_flat_structure, !names.is_empty());
        prop_assert_eq!(first.total_files_organized(), names.len());
        prop_assert!(first.errors.is_empty());

        // Every file ended up in exactly one destination, intact.
        if let Some((&destination, _)) = first.files_organized.iter().next() {
            prop_assert_eq!(first.files_organized.len(), 1);
            let dest = window.join(destination.dir_name().unwrap());
            for name in &names {
                prop_assert_eq!(&std::fs::read(dest.join(name)).unwrap(), &contents[name]);
                prop_assert!(!window.join(name).exists());
            }
        }

        let second = cleanup.cleanup_window(&task_ref, &label, false).unwrap();
        prop_assert!(!second.was_flat_structure);
        prop_assert_eq!(second.total_files_organized(), 0);
    }
}
