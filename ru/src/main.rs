//! repo_updater CLI.
//!
//! Discovers every git repository beneath a root directory, evaluates each
//! against the update policy (branch, cleanliness, unpushed commits, remote
//! freshness), pulls the ones with nothing in the way, and prints one
//! categorized report after all repositories have been processed.

#![forbid(unsafe_code)]

mod output;

use anyhow::Result;
use clap::Parser;
use ru_common::config::{DEFAULT_BRANCH, DEFAULT_UPDATE_TIMEOUT, SweepConfig, default_jobs};
use ru_common::sweep::Sweeper;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ru")]
#[command(author, version, about = "repo_updater - sweep and update git repositories")]
struct Cli {
    /// Directory tree to sweep
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Branch a repository must be on to be updated
    #[arg(short, long, default_value = DEFAULT_BRANCH, env = "RU_BRANCH")]
    branch: String,

    /// Maximum repositories evaluated in parallel [default: 10x logical cores]
    #[arg(short, long, env = "RU_JOBS")]
    jobs: Option<usize>,

    /// Per-invocation timeout for git inspection commands
    #[arg(long, default_value = "10s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Skip the remote-tracking refresh before the freshness check
    #[arg(long)]
    no_fetch: bool,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = SweepConfig {
        root: cli.root,
        branch: cli.branch.clone(),
        jobs: cli.jobs.unwrap_or_else(default_jobs),
        fetch: !cli.no_fetch,
        command_timeout: cli.timeout,
        update_timeout: DEFAULT_UPDATE_TIMEOUT,
    };
    // Fatal before any work begins; per-repository failures later never are.
    config.validate()?;

    tracing::info!(
        root = %config.root.display(),
        branch = %config.branch,
        jobs = config.jobs,
        "starting sweep"
    );

    let report = Sweeper::new(config).run().await;

    let stdout = std::io::stdout();
    if cli.json {
        serde_json::to_writer_pretty(stdout.lock(), &report)?;
        println!();
    } else {
        output::render(&mut stdout.lock(), &cli.branch, &report)?;
    }

    // Individual repository outcomes never affect the exit status.
    Ok(())
}
