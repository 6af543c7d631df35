//! Human-readable deadlock diagnostics
//!
//! Pure string building on top of [`Path::render`](crate::Path::render). The
//! caller decides how thread ids and lock records look through renderer
//! closures; the lock-flavoured defaults below produce messages like
//!
//! ```text
//! !!! DEADLOCK WARNING !!!
//! Possible deadlock: TID 2 <-- lock {B} -- WAITED BY TID 1 <-- lock {A} -- WAITED BY TID 2
//! ```

use crate::core::detector::DeadlockPath;
use crate::core::graph::Path;
use crate::core::types::{DependencyRecord, ThreadId};

/// Banner opening every deadlock warning
pub const WARNING_BANNER: &str = "!!! DEADLOCK WARNING !!!\n";
/// Prompt placed before the rendered cycle
pub const CYCLE_PROMPT: &str = "Possible deadlock: ";
/// Terminator placed after the rendered cycle
pub const CYCLE_TERMINATOR: &str = "\n";
/// Statement used by the full status when there is no cycle
pub const NO_DEADLOCK: &str = "No deadlocks detected.\n";

/// Default thread rendering: `TID <id>`
pub fn render_thread(tid: &ThreadId) -> String {
    format!("TID {tid}")
}

/// Default lock rendering, read between the holder and the waiter
pub fn render_lock(dep: &DependencyRecord) -> String {
    format!(" <-- lock {{{}}} -- WAITED BY ", dep.lock_name)
}

/// Render a cycle as a deadlock warning
///
/// # Returns
/// The banner, prompt, rendered cycle and terminator, or an empty string if the
/// path is empty or malformed
pub fn format_cycle_message<V, E, VR, ER>(
    path: &Path<'_, V, E>,
    vertex_renderer: VR,
    edge_renderer: ER,
) -> String
where
    VR: Fn(&V) -> String,
    ER: Fn(&E) -> String,
{
    let cycle = path.render(CYCLE_PROMPT, CYCLE_TERMINATOR, vertex_renderer, edge_renderer);
    if cycle.is_empty() {
        return cycle;
    }
    format!("{WARNING_BANNER}{cycle}")
}

/// Render a wait-for cycle with the default thread and lock renderers
pub fn deadlock_warning_message(path: &DeadlockPath<'_>) -> String {
    format_cycle_message(path, render_thread, render_lock)
}

/// Describe everything one thread holds and waits for, then the deadlock verdict
///
/// # Arguments
/// * `target` - Thread to report on
/// * `dependencies` - The snapshot the path was computed from
/// * `path` - Result of the deadlock analysis of that snapshot
pub fn format_full_status(
    target: ThreadId,
    dependencies: &[DependencyRecord],
    path: &DeadlockPath<'_>,
) -> String {
    let mut status = String::from("\nThread's async locks information:\n");

    for held in dependencies
        .iter()
        .filter(|dep| dep.is_held_only() && dep.holder_tid == target)
    {
        status.push_str(&format!(
            "HELD: lock {{{}}} , taken at:\n{}\n",
            held.lock_name, held.acquisition_trace
        ));
    }
    for waiting in dependencies.iter().filter(|dep| dep.waiter_tid == target) {
        status.push_str(&format!(
            "WAITING: lock {{{}}} , taken at:\n{}\n",
            waiting.lock_name, waiting.acquisition_trace
        ));
    }

    if path.is_empty() {
        status.push_str(NO_DEADLOCK);
    } else {
        status.push_str(&deadlock_warning_message(path));
    }
    status
}
