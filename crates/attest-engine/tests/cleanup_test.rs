//! Cleanup integration tests: flat-to-structured migration, idempotence,
//! and dry-run parity.

mod common;

use std::fs;
use std::sync::Arc;

use attest_core::config::requests::CleanupRequest;
use attest_core::errors::{CleanupError, ScanError};
use attest_core::types::identifiers::{TaskRef, WindowLabel};
use attest_core::types::state::{EvidenceLocation, LocalEvidenceState, WindowLayout};
use attest_engine::scanner::{EvidenceScanner, ScanCancellation};
use attest_engine::EvidenceCleanup;

use common::{
    write_generation_marker, write_submission_marker, write_validation_marker, EvidenceTree,
    MemoryTaskStore,
};

fn task_ref(s: &str) -> TaskRef {
    TaskRef::parse(s).unwrap()
}

fn window_label(s: &str) -> WindowLabel {
    WindowLabel::parse(s).unwrap()
}

#[test]
fn validated_flat_window_moves_to_ready() {
    let tree = EvidenceTree::new();
    let window = tree.window("ET-0001_Access_Review", "2025-Q1");
    tree.write_file(&window, "users.csv", b"login\nalice\n");
    tree.write_file(&window, "notes.md", b"# Notes\n");
    tree.write_file(&window, "collection_plan.md", b"# Plan\n");
    write_generation_marker(&window);
    write_validation_marker(&window);
    let context = window.join(".context");
    fs::create_dir_all(&context).unwrap();

    let cleanup = EvidenceCleanup::new(tree.config());
    let result = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2025-Q1"), false)
        .unwrap();

    assert!(result.was_flat_structure);
    assert!(result.errors.is_empty());
    assert_eq!(result.files_organized[&EvidenceLocation::Ready], 2);
    assert_eq!(result.total_files_organized(), 2);
    assert_eq!(
        result.metadata_moved,
        vec![".generation".to_string(), ".validation".to_string()]
    );

    assert!(window.join("ready/users.csv").is_file());
    assert!(window.join("ready/notes.md").is_file());
    assert!(window.join("ready/.generation/metadata.yaml").is_file());
    assert!(window.join("ready/.validation/validation.yaml").is_file());
    // Pinned plan files and the shared context directory never move.
    assert!(window.join("collection_plan.md").is_file());
    assert!(window.join(".context").is_dir());
}

#[test]
fn destinations_follow_markers() {
    let tree = EvidenceTree::new();

    let generated = tree.window("ET-0001_A", "2025");
    tree.write_file(&generated, "dump.csv", b"a\n");
    write_generation_marker(&generated);

    let submitted = tree.window("ET-0002_B", "2025");
    tree.write_file(&submitted, "report.pdf", b"pdf");
    write_generation_marker(&submitted);
    write_validation_marker(&submitted);
    write_submission_marker(&submitted, "accepted");

    let unmanaged = tree.window("ET-0003_C", "2025");
    tree.write_file(&unmanaged, "loose.txt", b"text");

    let cleanup = EvidenceCleanup::new(tree.config());
    let summary = cleanup.cleanup_all(false, &ScanCancellation::new()).unwrap();

    assert_eq!(summary.total_tasks, 3);
    assert_eq!(summary.total_windows, 3);
    assert_eq!(summary.windows_cleaned, 3);
    assert_eq!(summary.files_organized, 3);
    assert!(summary.errors.is_empty());

    assert!(generated.join("wip/dump.csv").is_file());
    assert!(submitted.join("submitted/report.pdf").is_file());
    assert!(unmanaged.join("wip/loose.txt").is_file());
}

#[test]
fn cleanup_is_idempotent_and_preserves_classification() {
    let tree = EvidenceTree::new();
    let window = tree.window("ET-0001_A", "2025");
    tree.write_file(&window, "users.csv", b"login\nalice\n");
    write_generation_marker(&window);
    write_validation_marker(&window);

    let scanner = EvidenceScanner::new(tree.config(), Arc::new(MemoryTaskStore::new()));
    let before = scanner.scan_task(&task_ref("ET-0001")).unwrap();

    let cleanup = EvidenceCleanup::new(tree.config());
    let first = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2025"), false)
        .unwrap();
    assert!(first.was_flat_structure);

    let second = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2025"), false)
        .unwrap();
    assert!(!second.was_flat_structure);
    assert_eq!(second.total_files_organized(), 0);

    // Reorganizing the window never changes what the scanner concludes.
    let after = scanner.scan_task(&task_ref("ET-0001")).unwrap();
    assert_eq!(before.local_state, LocalEvidenceState::Validated);
    assert_eq!(after.local_state, before.local_state);
    let window_state = &after.windows[&window_label("2025")];
    assert_eq!(window_state.layout, WindowLayout::Ready);
    assert_eq!(window_state.file_count, 1);
}

#[test]
fn dry_run_counts_without_touching_the_tree() {
    let tree = EvidenceTree::new();
    let window = tree.window("ET-0001_A", "2025");
    tree.write_file(&window, "users.csv", b"login\n");
    tree.write_file(&window, "notes.md", b"# notes\n");
    write_generation_marker(&window);

    let cleanup = EvidenceCleanup::new(tree.config());
    let dry = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2025"), true)
        .unwrap();

    assert!(dry.was_flat_structure);
    assert_eq!(dry.files_organized[&EvidenceLocation::Wip], 2);
    assert_eq!(dry.metadata_moved, vec![".generation".to_string()]);
    // Nothing moved.
    assert!(window.join("users.csv").is_file());
    assert!(window.join(".generation/metadata.yaml").is_file());
    assert!(!window.join("wip").exists());

    // The real run reports exactly what the dry run predicted.
    let real = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2025"), false)
        .unwrap();
    assert_eq!(real.files_organized, dry.files_organized);
    assert_eq!(real.metadata_moved, dry.metadata_moved);
}

#[test]
fn name_collisions_are_collected_not_fatal() {
    let tree = EvidenceTree::new();
    let window = tree.window("ET-0001_A", "2025");
    tree.write_file(&window, "users.csv", b"new\n");
    tree.write_file(&window, "notes.md", b"# notes\n");
    let wip = window.join("wip");
    fs::create_dir_all(&wip).unwrap();
    tree.write_file(&wip, "users.csv", b"old\n");

    let cleanup = EvidenceCleanup::new(tree.config());
    let result = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2025"), false)
        .unwrap();

    assert!(result.was_flat_structure);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("users.csv"));
    // The non-colliding file still moved; the collision target is intact.
    assert!(window.join("wip/notes.md").is_file());
    assert_eq!(fs::read(window.join("wip/users.csv")).unwrap(), b"old\n");
    assert_eq!(fs::read(window.join("users.csv")).unwrap(), b"new\n");
}

#[test]
fn request_dispatch_scopes_by_task_and_window() {
    let tree = EvidenceTree::new();
    let q1 = tree.window("ET-0001_A", "2025-Q1");
    tree.write_file(&q1, "a.csv", b"a\n");
    let q2 = tree.window("ET-0001_A", "2025-Q2");
    tree.write_file(&q2, "b.csv", b"b\n");
    let other = tree.window("ET-0002_B", "2025-Q1");
    tree.write_file(&other, "c.csv", b"c\n");

    let cleanup = EvidenceCleanup::new(tree.config());
    let cancel = ScanCancellation::new();

    // One task, one window.
    let summary = cleanup
        .cleanup(
            &CleanupRequest {
                task_ref: Some(task_ref("ET-0001")),
                window: Some(window_label("2025-Q1")),
                dry_run: false,
            },
            &cancel,
        )
        .unwrap();
    assert_eq!(summary.windows_cleaned, 1);
    assert!(q1.join("wip/a.csv").is_file());
    assert!(q2.join("b.csv").is_file());
    assert!(other.join("c.csv").is_file());

    // One task, every window.
    let summary = cleanup
        .cleanup(
            &CleanupRequest {
                task_ref: Some(task_ref("ET-0001")),
                window: None,
                dry_run: false,
            },
            &cancel,
        )
        .unwrap();
    assert_eq!(summary.total_windows, 2);
    assert_eq!(summary.windows_cleaned, 1);
    assert!(q2.join("wip/b.csv").is_file());
    assert!(other.join("c.csv").is_file());
}

#[test]
fn missing_targets_are_hard_errors() {
    let tree = EvidenceTree::new();
    tree.window("ET-0001_A", "2025");

    let cleanup = EvidenceCleanup::new(tree.config());
    let err = cleanup
        .cleanup_window(&task_ref("ET-9999"), &window_label("2025"), false)
        .unwrap_err();
    assert!(matches!(
        err,
        CleanupError::Scan(ScanError::TaskNotFound { .. })
    ));

    let err = cleanup
        .cleanup_window(&task_ref("ET-0001"), &window_label("2030"), false)
        .unwrap_err();
    assert!(matches!(
        err,
        CleanupError::Scan(ScanError::WindowNotFound { .. })
    ));
}

#[test]
fn cancelled_fleet_cleanup_returns_partial_summary() {
    let tree = EvidenceTree::new();
    let a = tree.window("ET-0001_A", "2025");
    tree.write_file(&a, "a.csv", b"a\n");

    let cleanup = EvidenceCleanup::new(tree.config());
    let cancel = ScanCancellation::new();
    cancel.cancel();
    let summary = cleanup.cleanup_all(false, &cancel).unwrap();
    assert_eq!(summary.total_tasks, 0);
    assert!(a.join("a.csv").is_file());
}
