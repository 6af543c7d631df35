use lockcycle::{
    DeadlockInfo, DeadlockReporter, LockCycle, LockIdentity, LockState, RequestInfo, ThreadId,
};
use std::sync::{Arc, Mutex as StdMutex, mpsc};

pub struct ReporterHarness {
    pub reporter: DeadlockReporter,
    pub rx: mpsc::Receiver<DeadlockInfo>,
    pub detected: Arc<StdMutex<bool>>,
}

#[allow(dead_code)]
pub fn start_reporter() -> ReporterHarness {
    let (tx, rx) = mpsc::channel::<DeadlockInfo>();
    let detected = Arc::new(StdMutex::new(false));
    let flag = Arc::clone(&detected);

    let reporter = LockCycle::new()
        .callback(move |info| {
            *flag.lock().unwrap() = true;
            let _ = tx.send(info.clone());
        })
        .start()
        .expect("Failed to initialize reporter");

    ReporterHarness {
        reporter,
        rx,
        detected,
    }
}

#[allow(dead_code)]
pub fn expect_deadlock(h: &ReporterHarness) -> DeadlockInfo {
    match h.rx.try_recv() {
        Ok(info) => {
            assert!(*h.detected.lock().unwrap(), "Deadlock flag should be set");
            info
        }
        Err(_) => panic!("No deadlock reported"),
    }
}

#[allow(dead_code)]
pub fn assert_no_deadlock(h: &ReporterHarness) {
    assert!(h.rx.try_recv().is_err(), "Unexpected deadlock detected");
    assert!(
        !*h.detected.lock().unwrap(),
        "Deadlock flag should not be set"
    );
}

/// A lock held by `holder` with `waiters` queued behind it
#[allow(dead_code)]
pub fn lock_state(name: &str, holder: ThreadId, waiters: &[ThreadId]) -> LockState {
    LockState {
        identity: LockIdentity::Named(name.to_string()),
        holders: vec![RequestInfo {
            tid: holder,
            creation_trace: format!("{name} taken by {holder}"),
        }],
        pending: waiters
            .iter()
            .map(|&tid| RequestInfo {
                tid,
                creation_trace: format!("{name} requested by {tid}"),
            })
            .collect(),
    }
}

/// Sort a cycle's threads so it can be compared as a set
#[allow(dead_code)]
pub fn sorted(cycle: &[ThreadId]) -> Vec<ThreadId> {
    let mut threads = cycle.to_vec();
    threads.sort_unstable();
    threads
}
