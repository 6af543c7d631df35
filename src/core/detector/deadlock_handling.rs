use crate::core::detector::DeadlockPath;
use crate::core::format::deadlock_warning_message;
use crate::core::types::DeadlockInfo;
use chrono::Utc;

/// Turn a detected cycle into the structured info handed to callbacks and logs
///
/// # Returns
/// * `None` - If the path is empty or malformed (nothing to report)
/// * `Some(DeadlockInfo)` - The cycle's threads, the locks between them and the
///   rendered warning
pub fn extract_deadlock_info(path: &DeadlockPath<'_>) -> Option<DeadlockInfo> {
    if !path.is_well_formed() {
        return None;
    }

    // The closing vertex repeats the first one
    let thread_cycle = path.vertices[..path.vertices.len() - 1].to_vec();
    let waited_locks = path
        .edges
        .iter()
        .map(|dep| dep.lock_name.clone())
        .collect();

    Some(DeadlockInfo {
        thread_cycle,
        waited_locks,
        message: deadlock_warning_message(path),
        timestamp: Utc::now().to_rfc3339(),
    })
}
