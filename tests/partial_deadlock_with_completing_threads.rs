use lockcycle::{DependencyRecord, analyze_for_deadlock};
mod common;
use common::{expect_deadlock, start_reporter};

#[test]
fn test_partial_deadlock_with_waiting_bystanders() {
    let harness = start_reporter();

    // Threads 10 and 11 wait behind the deadlock but are not part of it.
    // They are discovered first, so the search starts from them.
    let deps = vec![
        DependencyRecord::waiting(10, 11, "Resource D", ""),
        DependencyRecord::waiting(11, 1, "Resource C", ""),
        DependencyRecord::held(1, "Resource A", ""),
        DependencyRecord::held(2, "Resource B", ""),
        DependencyRecord::waiting(1, 2, "Resource B", ""),
        DependencyRecord::waiting(2, 1, "Resource A", ""),
    ];

    let info = harness.reporter.check(&deps).expect("deadlock expected");
    assert_eq!(expect_deadlock(&harness), info);
    assert_eq!(info.thread_cycle, vec![1, 2]);
    assert_eq!(info.waited_locks, vec!["Resource A", "Resource B"]);
    assert!(!info.message.contains("TID 10"));
    assert!(!info.message.contains("TID 11"));
}

#[test]
fn test_first_of_two_deadlocks_is_reported() {
    // Two independent cycles; the one whose threads appear first wins
    let deps = vec![
        DependencyRecord::waiting(5, 6, "X", ""),
        DependencyRecord::waiting(6, 5, "Y", ""),
        DependencyRecord::waiting(1, 2, "P", ""),
        DependencyRecord::waiting(2, 1, "Q", ""),
    ];

    let path = analyze_for_deadlock(&deps);
    assert_eq!(path.vertices, vec![5, 6, 5]);
}
