//! Deadlock analysis over a dependency snapshot
//!
//! The analyzer turns every "waiter is blocked on a lock held by holder"
//! record into a `waiter -> holder` wait-for edge, builds a [`Graph`] from
//! those edges and reports its first cycle. Held-only records contribute no
//! edge; they are kept in the snapshot for per-thread reporting.

pub mod deadlock_handling;
pub mod snapshot;

use crate::core::format::format_full_status;
use crate::core::graph::{Graph, Path};
use crate::core::types::{DependencyRecord, ThreadId};

pub use deadlock_handling::extract_deadlock_info;
pub use snapshot::{LockIdentity, LockState, RequestInfo, collect_lock_dependencies};

/// Wait-for graph over thread ids, with edges borrowed from dependency records
pub type LockGraph<'a> = Graph<'a, ThreadId, DependencyRecord>;

/// A wait-for cycle; empty when there is no deadlock
///
/// `vertices[i]` holds lock `edges[i]`, which `vertices[i + 1]` waits for.
pub type DeadlockPath<'a> = Path<'a, ThreadId, DependencyRecord>;

/// Build the wait-for graph of a snapshot
pub fn build_lock_graph(dependencies: &[DependencyRecord]) -> LockGraph<'_> {
    Graph::new(
        dependencies
            .iter()
            .filter(|dep| !dep.is_held_only())
            .map(|dep| (dep.waiter_tid, dep.holder_tid, dep)),
    )
}

/// Search a dependency snapshot for a deadlock
///
/// Pure function of its input: an empty path means no deadlock, otherwise the
/// path names the thread cycle and, between each pair, the lock record that
/// connects them. Self-waits are reported like any other cycle.
///
/// # Arguments
/// * `dependencies` - Held-only and waiting records of one point-in-time snapshot
pub fn analyze_for_deadlock(dependencies: &[DependencyRecord]) -> DeadlockPath<'_> {
    build_lock_graph(dependencies).find_first_cycle()
}

/// Collect, analyze and describe the lock situation of one thread
///
/// This is the text surfaced to a thread whose lock request gave up: what it
/// holds, what it waits for, and whether the snapshot contains a deadlock.
pub fn dump_locks_info_for_thread(target: ThreadId, locks: &[LockState]) -> String {
    let dependencies = collect_lock_dependencies(locks);
    let path = analyze_for_deadlock(&dependencies);
    format_full_status(target, &dependencies, &path)
}
