use clap::{Parser, Subcommand, ArgAction};
use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::{self, Config};
use crate::output::{self, OutputMode};
use crate::scanner;
use crate::snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(version)]
#[command(about = "Monitor a directory tree for modified, added and deleted files")]
#[command(long_about = "Vigil hashes every file under a directory and compares the result \
    against the snapshot recorded by the previous run.\n\n\
    Examples:\n  \
    vigil scan                      # Scan the current directory, update the baseline\n  \
    vigil scan /etc --store /var/lib/vigil/etc.json\n  \
    vigil check /etc                # Report changes without touching the baseline\n  \
    vigil scan --exclude target --exclude '**/*.log'")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity (-v, -vv for more)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory, report changes and update the baseline
    #[command(visible_alias = "s")]
    Scan {
        /// Directory to monitor (default: current directory)
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,

        /// Snapshot file to compare against and update
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,

        /// Exclude paths matching pattern, relative to ROOT (repeatable)
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Output the report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Report changes without updating the baseline (exits 1 if any)
    #[command(visible_alias = "c")]
    Check {
        /// Directory to monitor (default: current directory)
        #[arg(value_name = "ROOT")]
        root: Option<PathBuf>,

        /// Snapshot file to compare against
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,

        /// Exclude paths matching pattern, relative to ROOT (repeatable)
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Output the report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the recorded baseline snapshot
    Show {
        /// Snapshot file to read
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,

        /// Dump the raw snapshot object as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn run(self) -> anyhow::Result<ExitCode> {
        let output_mode = if self.quiet {
            OutputMode::Quiet
        } else if self.verbose >= 2 {
            OutputMode::VeryVerbose
        } else if self.verbose == 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        };

        match self.command {
            Commands::Scan {
                root,
                store,
                exclude,
                json,
            } => {
                scan_and_report(root, store, &exclude, json, output_mode, true)?;
                Ok(ExitCode::SUCCESS)
            }
            Commands::Check {
                root,
                store,
                exclude,
                json,
            } => {
                let outcome = scan_and_report(root, store, &exclude, json, output_mode, false)?;
                if outcome.report.is_empty() {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::from(1))
                }
            }
            Commands::Show { store, json } => {
                let store_path = config::resolve_store(store);
                let snapshot = Snapshot::load(&store_path)?;
                if json {
                    output::print_store_json(&snapshot)?;
                } else {
                    output::print_store(&snapshot, &store_path, output_mode);
                }
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn scan_and_report(
    root: Option<PathBuf>,
    store: Option<PathBuf>,
    exclude: &[String],
    json: bool,
    mode: OutputMode,
    persist: bool,
) -> anyhow::Result<scanner::ScanOutcome> {
    let root = root.unwrap_or_else(|| PathBuf::from("."));
    let config = Config::new(root, store);
    let options = ScanOptions {
        excludes: build_exclude_set(exclude)?,
    };

    let outcome = scanner::scan(&config, &options, mode)?;

    if json {
        output::print_json(&outcome, &config.store_path)?;
    } else {
        output::print_report(&outcome, &config.store_path, mode);
    }

    // The report is always rendered before the store is touched.
    if persist {
        outcome.current.save(&config.store_path)?;
        if !json && (mode == OutputMode::Verbose || mode == OutputMode::VeryVerbose) {
            println!("Baseline updated: {}", config.store_path.display());
        }
    }

    Ok(outcome)
}

/// Exit code for failures that carry no `MonitorError` of their own.
///
/// Under `check`, exit 1 already means "changes found", so plain
/// failures report as 2 there.
pub fn generic_exit_code(command: &Commands) -> u8 {
    match command {
        Commands::Check { .. } => 2,
        _ => 1,
    }
}

fn build_exclude_set(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .with_context(|| format!("invalid exclude pattern '{}'", pattern))?;
        builder.add(glob);
    }
    builder.build().context("failed to compile exclude patterns")
}

pub struct ScanOptions {
    pub excludes: GlobSet,
}
