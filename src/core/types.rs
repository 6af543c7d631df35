use serde::{Deserialize, Serialize};

/// Thread identifier type
///
/// Identifies an execution context (thread or task) that holds or waits on a lock.
pub type ThreadId = usize;

/// Sentinel waiter id meaning "nobody is waiting"
///
/// A [`DependencyRecord`] carrying this waiter only documents that its holder
/// owns the lock.
pub const INVALID_THREAD_ID: ThreadId = 0;

fn invalid_thread_id() -> ThreadId {
    INVALID_THREAD_ID
}

/// One observed relation between two execution contexts over one lock
///
/// Either "`holder_tid` holds `lock_name`" (when `waiter_tid` is
/// [`INVALID_THREAD_ID`]) or "`waiter_tid` is blocked on `lock_name`, which is
/// held by `holder_tid`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    /// Thread blocked on the lock, or [`INVALID_THREAD_ID`]
    #[serde(default = "invalid_thread_id")]
    pub waiter_tid: ThreadId,
    /// Thread currently holding the lock
    pub holder_tid: ThreadId,
    /// Human-readable label of the lock
    pub lock_name: String,
    /// Opaque text captured when the lock was requested, for diagnostics only
    #[serde(default)]
    pub acquisition_trace: String,
}

impl DependencyRecord {
    /// Record that `holder` owns the lock and nobody waits for it
    pub fn held(holder: ThreadId, lock_name: impl Into<String>, trace: impl Into<String>) -> Self {
        DependencyRecord {
            waiter_tid: INVALID_THREAD_ID,
            holder_tid: holder,
            lock_name: lock_name.into(),
            acquisition_trace: trace.into(),
        }
    }

    /// Record that `waiter` is blocked on a lock owned by `holder`
    pub fn waiting(
        waiter: ThreadId,
        holder: ThreadId,
        lock_name: impl Into<String>,
        trace: impl Into<String>,
    ) -> Self {
        DependencyRecord {
            waiter_tid: waiter,
            holder_tid: holder,
            lock_name: lock_name.into(),
            acquisition_trace: trace.into(),
        }
    }

    /// True when this record only documents a held lock and yields no wait-for edge
    pub fn is_held_only(&self) -> bool {
        self.waiter_tid == INVALID_THREAD_ID
    }
}

/// Represents the result of a deadlock detection
///
/// This structure contains the information about a detected deadlock that is
/// handed to the deadlock callback and written to the report log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlockInfo {
    /// Threads involved in the deadlock cycle
    ///
    /// Listed in reporting order without repeating the first thread at the end:
    /// each thread is waited on by the one after it, and the last one waits on
    /// the first.
    pub thread_cycle: Vec<ThreadId>,

    /// Names of the locks connecting consecutive threads of `thread_cycle`
    ///
    /// `waited_locks[i]` is held by `thread_cycle[i]` and awaited by the next
    /// thread in the cycle.
    pub waited_locks: Vec<String>,

    /// Human-readable deadlock warning
    pub message: String,

    /// ISO-8601 formatted timestamp indicating when the deadlock was detected
    pub timestamp: String,
}
