//! Report log for deadlock checks
//!
//! Every check performed through a [`DeadlockReporter`](crate::DeadlockReporter)
//! can be recorded as one JSON line: either a clean verdict or the full
//! [`DeadlockInfo`]. Writes happen on a background thread fed through a
//! channel, so checking never blocks on file I/O.

use crate::core::types::DeadlockInfo;
use anyhow::{Context, Result};
use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one deadlock check
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ReportEvent {
    /// The snapshot had no wait-for cycle
    NoDeadlock,
    /// A cycle was found
    Deadlock,
}

/// Structure for a single log entry
#[derive(Debug, Serialize, Clone)]
pub struct LogEntry {
    /// Verdict of the check
    pub event: ReportEvent,
    /// Number of dependency records in the analyzed snapshot
    pub dependencies: usize,
    /// Absolute timestamp of the check (seconds since Unix Epoch)
    pub timestamp: f64,
    /// Details of the deadlock, for `Deadlock` entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadlock: Option<DeadlockInfo>,
}

/// Commands for controlling the async logger thread
#[derive(Debug)]
enum LoggerCommand {
    /// Write a log entry to the file
    Entry(LogEntry),
    /// Flush all pending entries to disk and signal completion
    Flush(Sender<()>),
}

/// JSON-lines logger for deadlock check results
pub struct ReportLogger {
    /// Channel sender for async communication with logger thread
    sender: Sender<LoggerCommand>,
    /// Held while a flush waits for confirmation
    flush_guard: Mutex<()>,
    /// File the entries go to, after placeholder substitution
    path: PathBuf,
}

impl Drop for ReportLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("lockcycle: report log not flushed on drop: {e:#}");
        }
    }
}

impl ReportLogger {
    /// Create a logger writing to `path`
    ///
    /// If the path contains "{timestamp}", it is replaced with the current
    /// time. Missing parent directories are created and an existing file is
    /// truncated.
    ///
    /// # Errors
    /// Returns an error if the directory or the file cannot be created
    pub fn with_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();

        #[allow(clippy::literal_string_with_formatting_args)]
        let file_path = if path_buf.to_string_lossy().contains("{timestamp}") {
            let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(
                path_buf
                    .to_string_lossy()
                    .replace("{timestamp}", &timestamp.to_string()),
            )
        } else {
            path_buf
        };

        if let Some(parent) = file_path.parent()
            && parent.to_string_lossy() != ""
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open log file {}", file_path.display()))?;

        let (tx, rx) = unbounded::<LoggerCommand>();

        thread::Builder::new()
            .name("lockcycle-logger".into())
            .spawn(move || logger_thread(file, rx))
            .context("Failed to spawn logger thread")?;

        Ok(ReportLogger {
            sender: tx,
            flush_guard: Mutex::new(()),
            path: file_path,
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the result of one check
    ///
    /// # Arguments
    /// * `dependencies` - Size of the analyzed snapshot
    /// * `deadlock` - The detected deadlock, if any
    pub fn log_check(&self, dependencies: usize, deadlock: Option<&DeadlockInfo>) {
        let now = Utc::now();
        let timestamp = now.timestamp() as f64 + now.timestamp_subsec_micros() as f64 / 1_000_000.0;

        let entry = LogEntry {
            event: if deadlock.is_some() {
                ReportEvent::Deadlock
            } else {
                ReportEvent::NoDeadlock
            },
            dependencies,
            timestamp,
            deadlock: deadlock.cloned(),
        };

        if let Err(e) = self.sender.send(LoggerCommand::Entry(entry)) {
            eprintln!("lockcycle: report log entry dropped: {e}");
        }
    }

    /// Force all pending entries to disk
    ///
    /// Blocks until the writer thread confirms. Concurrent callers return
    /// immediately while another flush is in progress.
    ///
    /// # Errors
    /// Returns an error if the writer thread is gone or does not answer within
    /// ten seconds
    pub fn flush(&self) -> Result<()> {
        let Some(_in_flight) = self.flush_guard.try_lock() else {
            return Ok(());
        };

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        self.sender
            .send(LoggerCommand::Flush(done_tx))
            .context("Logger thread is not running")?;
        done_rx
            .recv_timeout(FLUSH_TIMEOUT)
            .context("Flush operation timed out")
    }
}

fn write_entry(writer: &mut impl Write, entry: &LogEntry) -> io::Result<()> {
    let json = serde_json::to_string(entry)?;
    writeln!(writer, "{json}")
}

/// Writer loop; ends once every sender is gone
fn logger_thread(file: File, rx: Receiver<LoggerCommand>) {
    let mut writer = BufWriter::new(file);

    for cmd in rx {
        let outcome = match cmd {
            LoggerCommand::Entry(entry) => write_entry(&mut writer, &entry),
            LoggerCommand::Flush(done) => {
                let flushed = writer.flush();
                let _ = done.send(());
                flushed
            }
        };
        if let Err(e) = outcome {
            eprintln!("lockcycle: report log write failed: {e}");
        }
    }

    if let Err(e) = writer.flush() {
        eprintln!("lockcycle: report log final flush failed: {e}");
    }
}
