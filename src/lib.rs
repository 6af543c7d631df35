//! # LockCycle
//!
//! Deadlock detection for async lock snapshots.
//!
//! LockCycle takes a point-in-time list of "who holds / who waits for which
//! lock" records, builds the wait-for graph between execution contexts and
//! reports the first cycle it finds, together with the lock connecting each
//! pair of threads in that cycle.
//!
//! ## Features
//!
//! - Generic directed graph with iterative three-color cycle search
//! - Deadlock analysis of dependency snapshots
//! - Human-readable warnings and per-thread lock reports
//! - Structured JSON-lines report log (`logging` feature)
//!
//! ## Example
//!
//! ```
//! use lockcycle::{DependencyRecord, analyze_for_deadlock, format::deadlock_warning_message};
//!
//! let deps = vec![
//!     DependencyRecord::waiting(2, 1, "A", ""),
//!     DependencyRecord::waiting(1, 2, "B", ""),
//! ];
//! let cycle = analyze_for_deadlock(&deps);
//! assert_eq!(cycle.vertices, vec![2, 1, 2]);
//! assert!(deadlock_warning_message(&cycle).contains("lock {B}"));
//! ```

mod core;
pub use crate::core::{
    DeadlockInfo, DeadlockPath, DeadlockReporter, DependencyRecord, INVALID_THREAD_ID, LockCycle,
    LockGraph, LockIdentity, LockState, RequestInfo, ThreadId, analyze_for_deadlock,
    collect_lock_dependencies, dump_locks_info_for_thread,
    graph::{DEFAULT_EDGE_ARROW, DEFAULT_PROMPT, DEFAULT_TERMINATOR, EdgeDef, Graph, Path},
};

pub use crate::core::format;

#[cfg(feature = "logging")]
pub use crate::core::logger::{LogEntry, ReportEvent, ReportLogger};
