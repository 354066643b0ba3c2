use crate::cli::ScanOptions;
use crate::config::Config;
use crate::differ::{self, ChangeReport};
use crate::error::MonitorError;
use crate::hasher::{self, ReadFailure};
use crate::output::OutputMode;
use crate::progress;
use crate::snapshot::{self, Snapshot};
use crate::walker;
use colored::*;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Counters accumulated over one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Files successfully hashed into the current snapshot.
    pub files_scanned: usize,
    /// Total bytes of content hashed.
    pub bytes_scanned: u64,
    /// Files that existed but could not be opened or read.
    pub read_failures: usize,
    /// Directory entries the walk had to skip.
    pub walk_errors: usize,
    pub duration: Duration,
}

/// Everything one scan produced: the baseline that was loaded, the
/// freshly hashed state, and the diff between them. Persisting the new
/// state is the caller's decision.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Canonical form of the scanned root.
    pub root: PathBuf,
    pub previous: Snapshot,
    pub current: Snapshot,
    pub report: ChangeReport,
    pub stats: ScanStats,
}

/// Run one full scan cycle: load the baseline snapshot, enumerate the
/// tree, hash every file in parallel, and diff against the baseline.
///
/// Unreadable files are skipped with a warning and end up absent from
/// the current snapshot; per-entry traversal errors likewise only cost
/// the affected entries. A corrupt or unreadable store and an invalid
/// root are fatal, and both are raised before any file is hashed.
pub fn scan(
    config: &Config,
    options: &ScanOptions,
    mode: OutputMode,
) -> Result<ScanOutcome, MonitorError> {
    let start = Instant::now();

    let previous = Snapshot::load(&config.store_path)?;

    let spinner = if mode != OutputMode::Quiet {
        Some(progress::create_spinner("Walking directory tree..."))
    } else {
        None
    };
    let walked = walker::walk_tree(&config.root, &options.excludes);
    if let Some(sp) = spinner {
        progress::finish_and_clear(&sp);
    }
    let mut walked = walked?;

    // The store may live inside the monitored tree; never track it, or
    // every run would report it as modified.
    if let Ok(store_abs) = fs::canonicalize(&config.store_path) {
        walked.files.retain(|path| *path != store_abs);
    }

    let bar = if mode != OutputMode::Quiet && !walked.files.is_empty() {
        Some(progress::create_progress_bar(
            walked.files.len() as u64,
            "Hashing files...",
        ))
    } else {
        None
    };

    let failures: Mutex<Vec<ReadFailure>> = Mutex::new(Vec::new());

    let hashed: Vec<(String, String, u64)> = walked
        .files
        .par_iter()
        .filter_map(|path| {
            let entry = match hasher::hash_file(path) {
                Ok(digest) => {
                    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                    Some((snapshot::path_key(path, &walked.root), digest, size))
                }
                Err(failure) => {
                    if let Ok(mut fails) = failures.lock() {
                        fails.push(failure);
                    }
                    None
                }
            };
            if let Some(ref pb) = bar {
                pb.inc(1);
            }
            entry
        })
        .collect();

    if let Some(pb) = bar {
        progress::finish_and_clear(&pb);
    }

    let mut current = Snapshot::new();
    let mut bytes_scanned = 0u64;
    for (path, digest, size) in hashed {
        bytes_scanned += size;
        current.insert(path, digest);
    }

    let failures = failures.into_inner().unwrap_or_default();

    if mode != OutputMode::Quiet {
        for failure in &failures {
            eprintln!("{} {}", "Warning:".yellow(), failure);
        }
        for err in &walked.skipped {
            eprintln!("{} skipped during walk: {}", "Warning:".yellow(), err);
        }
    }

    let stats = ScanStats {
        files_scanned: current.len(),
        bytes_scanned,
        read_failures: failures.len(),
        walk_errors: walked.skipped.len(),
        duration: start.elapsed(),
    };

    let report = differ::diff(&previous, &current);

    Ok(ScanOutcome {
        root: walked.root,
        previous,
        current,
        report,
        stats,
    })
}
