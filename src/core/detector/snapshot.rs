//! Conversion of live lock states into dependency records
//!
//! The caller captures the lock states under whatever mutex guards them; this
//! module only flattens them into the records the analyzer consumes.

use crate::core::types::{DependencyRecord, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a lock is known to its users
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockIdentity {
    /// Lock requested by name
    Named(String),
    /// Lock created without a name, known by its numeric id
    Anonymous(u32),
}

impl fmt::Display for LockIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockIdentity::Named(name) => f.write_str(name),
            LockIdentity::Anonymous(id) => write!(f, "anonymous #{id}"),
        }
    }
}

/// A lock request as seen by the lock bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Thread that issued the request
    pub tid: ThreadId,
    /// Trace captured when the request was created
    #[serde(default)]
    pub creation_trace: String,
}

/// Point-in-time state of one lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    /// Name or id the lock is reported under
    pub identity: LockIdentity,
    /// Granted requests
    #[serde(default)]
    pub holders: Vec<RequestInfo>,
    /// Requests still waiting to be granted
    #[serde(default)]
    pub pending: Vec<RequestInfo>,
}

/// Flatten lock states into dependency records
///
/// For every lock with at least one holder, emits a held-only record for its
/// first holder followed by one waiting record per pending request. Locks
/// without holders cannot be waited on and are skipped.
pub fn collect_lock_dependencies(locks: &[LockState]) -> Vec<DependencyRecord> {
    let mut dependencies = Vec::new();
    for lock in locks {
        let Some(holder) = lock.holders.first() else {
            continue;
        };
        let lock_name = lock.identity.to_string();

        dependencies.push(DependencyRecord::held(
            holder.tid,
            lock_name.clone(),
            holder.creation_trace.clone(),
        ));
        dependencies.extend(lock.pending.iter().map(|waiter| {
            DependencyRecord::waiting(
                waiter.tid,
                holder.tid,
                lock_name.clone(),
                waiter.creation_trace.clone(),
            )
        }));
    }
    dependencies
}
