use anyhow::{Context, Result};
use clap::Parser;
use lockcycle::{
    DependencyRecord, LockCycle, LockState, ThreadId, analyze_for_deadlock,
    collect_lock_dependencies, format,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "LockCycle - find wait-for cycles in a lock dependency snapshot"
)]
struct Cli {
    /// JSON file holding an array of dependency records
    snapshot: PathBuf,

    /// Read the snapshot as an array of lock states instead
    #[arg(long)]
    locks: bool,

    /// Print the full lock report for this thread
    #[arg(long)]
    thread: Option<ThreadId>,

    /// Append the check result to this report log
    #[arg(long)]
    log: Option<PathBuf>,
}

fn load_dependencies(cli: &Cli) -> Result<Vec<DependencyRecord>> {
    let raw = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("Failed to read snapshot {}", cli.snapshot.display()))?;

    if cli.locks {
        let locks: Vec<LockState> =
            serde_json::from_str(&raw).context("Failed to parse lock states")?;
        Ok(collect_lock_dependencies(&locks))
    } else {
        serde_json::from_str(&raw).context("Failed to parse dependency records")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dependencies = load_dependencies(&cli)?;

    // The printed output below replaces the default stderr warning
    let mut builder = LockCycle::new().callback(|_| {});
    if let Some(log) = &cli.log {
        builder = builder.with_log(log);
    }
    let reporter = builder.start()?;
    let deadlock = reporter.check(&dependencies);
    reporter.flush()?;

    match cli.thread {
        Some(tid) => {
            let path = analyze_for_deadlock(&dependencies);
            print!("{}", format::format_full_status(tid, &dependencies, &path));
        }
        None => match deadlock {
            Some(info) => print!("{}", info.message),
            None => print!("{}", format::NO_DEADLOCK),
        },
    }
    Ok(())
}
