use crate::scanner::ScanOutcome;
use crate::snapshot::Snapshot;
use colored::*;
use serde::Serialize;
use std::path::Path;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // More details
    VeryVerbose, // All details including digests
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: String,
    timestamp: String,
    root: String,
    store: String,
    modified: &'a [String],
    added: &'a [String],
    deleted: &'a [String],
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    modified: usize,
    added: usize,
    deleted: usize,
    files_scanned: usize,
    bytes_scanned: u64,
    size_human: String,
    read_failures: usize,
    walk_errors: usize,
    duration_ms: u64,
}

pub fn print_report(outcome: &ScanOutcome, store_path: &Path, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    let detailed = mode == OutputMode::Verbose || mode == OutputMode::VeryVerbose;
    let report = &outcome.report;

    println!();
    if detailed {
        println!("Root:  {}", outcome.root.display());
        println!("Store: {}", store_path.display());
    }

    if report.is_empty() {
        if detailed {
            println!();
        }
        println!("{}", "No changes detected.".green());
    } else {
        if detailed {
            println!();
        }
        println!("{}", "File changes detected:".bold());

        if !report.modified.is_empty() {
            println!();
            println!(
                "{}",
                format!("Modified files ({}):", report.modified.len())
                    .yellow()
                    .bold()
            );
            for path in &report.modified {
                if mode == OutputMode::VeryVerbose {
                    let old = digest_preview(outcome.previous.digest(path));
                    let new = digest_preview(outcome.current.digest(path));
                    println!("  - {} {}", path, format!("({} -> {})", old, new).dimmed());
                } else {
                    println!("  - {}", path);
                }
            }
        }

        if !report.added.is_empty() {
            println!();
            println!(
                "{}",
                format!("New files ({}):", report.added.len()).green().bold()
            );
            for path in &report.added {
                if mode == OutputMode::VeryVerbose {
                    let digest = digest_preview(outcome.current.digest(path));
                    println!("  - {} {}", path, format!("({})", digest).dimmed());
                } else {
                    println!("  - {}", path);
                }
            }
        }

        if !report.deleted.is_empty() {
            println!();
            println!(
                "{}",
                format!("Deleted files ({}):", report.deleted.len())
                    .red()
                    .bold()
            );
            for path in &report.deleted {
                if mode == OutputMode::VeryVerbose {
                    let digest = digest_preview(outcome.previous.digest(path));
                    println!("  - {} {}", path, format!("({})", digest).dimmed());
                } else {
                    println!("  - {}", path);
                }
            }
        }
    }

    if detailed {
        let stats = &outcome.stats;
        println!();
        println!(
            "Scanned {} files ({}) in {:.2}s",
            stats.files_scanned,
            bytesize::to_string(stats.bytes_scanned, true),
            stats.duration.as_secs_f64()
        );
        if stats.read_failures > 0 || stats.walk_errors > 0 {
            println!(
                "Skipped {} unreadable files, {} traversal errors",
                stats.read_failures, stats.walk_errors
            );
        }
    }
    println!();
}

pub fn print_json(outcome: &ScanOutcome, store_path: &Path) -> anyhow::Result<()> {
    let report = &outcome.report;
    let stats = &outcome.stats;
    let json_report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        root: outcome.root.display().to_string(),
        store: store_path.display().to_string(),
        modified: &report.modified,
        added: &report.added,
        deleted: &report.deleted,
        summary: JsonSummary {
            modified: report.modified.len(),
            added: report.added.len(),
            deleted: report.deleted.len(),
            files_scanned: stats.files_scanned,
            bytes_scanned: stats.bytes_scanned,
            size_human: bytesize::to_string(stats.bytes_scanned, true),
            read_failures: stats.read_failures,
            walk_errors: stats.walk_errors,
            duration_ms: stats.duration.as_millis() as u64,
        },
    };

    println!("{}", serde_json::to_string_pretty(&json_report)?);
    Ok(())
}

/// Render the recorded baseline, one `digest  path` line per entry.
pub fn print_store(snapshot: &Snapshot, store_path: &Path, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    println!();
    if snapshot.is_empty() {
        println!("No baseline recorded at {}", store_path.display());
    } else {
        for (path, digest) in snapshot.iter() {
            println!("{}  {}", digest.dimmed(), path);
        }
        println!();
        println!(
            "{} files tracked in {}",
            snapshot.len(),
            store_path.display()
        );
    }
    println!();
}

pub fn print_store_json(snapshot: &Snapshot) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}

fn digest_preview(digest: Option<&String>) -> &str {
    match digest {
        // Loaded stores may hold hand-edited values; clip only on a
        // char boundary and fall back to the whole string.
        Some(d) => d.get(..12).unwrap_or(d),
        None => "?",
    }
}
