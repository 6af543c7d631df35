// Core types
pub mod types;
pub use types::*;

// Graph implementation
pub mod graph;

// Deadlock analysis
pub mod detector;
pub use detector::{
    DeadlockPath, LockGraph, LockIdentity, LockState, RequestInfo, analyze_for_deadlock,
    collect_lock_dependencies, dump_locks_info_for_thread,
};

// Message building
pub mod format;

// Report log
#[cfg(feature = "logging")]
pub mod logger;
#[cfg(feature = "logging")]
pub use logger::ReportLogger;

#[cfg(feature = "logging")]
use anyhow::Context;
use anyhow::Result;
use parking_lot::Mutex;

type DeadlockCallback = Box<dyn Fn(&DeadlockInfo) + Send + Sync + 'static>;

/// Prefix of the default stderr warning
const WARNING_PREFIX: &str = "DeadlockDetector: ";

/// LockCycle configuration struct
pub struct LockCycle {
    #[cfg(feature = "logging")]
    log_path: Option<std::path::PathBuf>,
    callback: DeadlockCallback,
}

impl Default for LockCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LockCycle {
    /// Create a new LockCycle with default settings
    ///
    /// By default:
    /// - Logging is disabled
    /// - Callback prints the deadlock warning to stderr
    pub fn new() -> Self {
        LockCycle {
            #[cfg(feature = "logging")]
            log_path: None,
            callback: Box::new(|info: &DeadlockInfo| {
                eprintln!("{WARNING_PREFIX}{}", info.message);
            }),
        }
    }

    /// Activate the report log and set the path for the log file
    ///
    /// # Arguments
    /// * `path` - Path to the log file. If the path contains "{timestamp}",
    ///   it will be replaced with the current timestamp.
    ///
    /// # Returns
    /// The builder for method chaining
    #[cfg(feature = "logging")]
    pub fn with_log<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.log_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set a custom callback to be invoked when a deadlock is detected
    ///
    /// # Arguments
    /// * `callback` - Function to call when a deadlock is detected
    ///
    /// # Returns
    /// The builder for method chaining
    pub fn callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DeadlockInfo) + Send + Sync + 'static,
    {
        self.callback = Box::new(callback);
        self
    }

    /// Build the reporter with the configured settings
    ///
    /// # Errors
    /// Returns an error if logger initialization fails
    pub fn start(self) -> Result<DeadlockReporter> {
        #[cfg(feature = "logging")]
        let logger = match self.log_path {
            Some(path) => Some(ReportLogger::with_file(path).context("Failed to initialize logger")?),
            None => None,
        };

        Ok(DeadlockReporter {
            callback: self.callback,
            #[cfg(feature = "logging")]
            logger,
            last_deadlock: Mutex::new(None),
        })
    }
}

/// Runs deadlock checks over snapshots and reports what it finds
///
/// Each check is independent: the reporter keeps no graph between calls, only
/// the most recent deadlock for later inspection. It can be shared between
/// threads.
pub struct DeadlockReporter {
    callback: DeadlockCallback,
    #[cfg(feature = "logging")]
    logger: Option<ReportLogger>,
    last_deadlock: Mutex<Option<DeadlockInfo>>,
}

impl DeadlockReporter {
    /// Analyze a dependency snapshot and report a deadlock if there is one
    ///
    /// The check is logged (when a log is configured) whatever the outcome;
    /// the callback only runs for a deadlock.
    ///
    /// # Returns
    /// The detected deadlock, or `None`
    pub fn check(&self, dependencies: &[DependencyRecord]) -> Option<DeadlockInfo> {
        let path = analyze_for_deadlock(dependencies);
        let info = detector::extract_deadlock_info(&path);

        #[cfg(feature = "logging")]
        if let Some(logger) = &self.logger {
            logger.log_check(dependencies.len(), info.as_ref());
        }

        if let Some(info) = &info {
            (self.callback)(info);
            *self.last_deadlock.lock() = Some(info.clone());
        }
        info
    }

    /// Flatten lock states into a snapshot and [`check`](Self::check) it
    pub fn check_locks(&self, locks: &[LockState]) -> Option<DeadlockInfo> {
        self.check(&collect_lock_dependencies(locks))
    }

    /// Describe what `target` holds and waits for in a snapshot, followed by
    /// the deadlock verdict for the whole snapshot
    ///
    /// Unlike [`check`](Self::check), this neither logs nor runs the callback.
    pub fn status_for_thread(&self, target: ThreadId, dependencies: &[DependencyRecord]) -> String {
        let path = analyze_for_deadlock(dependencies);
        format::format_full_status(target, dependencies, &path)
    }

    /// The most recent deadlock reported by this reporter
    pub fn last_deadlock(&self) -> Option<DeadlockInfo> {
        self.last_deadlock.lock().clone()
    }

    /// Path of the report log, if logging is active
    #[cfg(feature = "logging")]
    pub fn log_path(&self) -> Option<&std::path::Path> {
        self.logger.as_ref().map(|logger| logger.path())
    }

    /// Flush pending report log entries to disk
    ///
    /// # Errors
    /// Returns an error if the logger fails to confirm the flush
    #[cfg(feature = "logging")]
    pub fn flush(&self) -> Result<()> {
        match &self.logger {
            Some(logger) => logger.flush(),
            None => Ok(()),
        }
    }
}
