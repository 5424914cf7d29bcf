use clap::Parser;
use std::path::PathBuf;

use pmguard::config::ConfigOverrides;
use pmguard::install_guard::domain::{InstallCommand, PackageManager};

/// Scan every package an install would pull in for malware before running it
#[derive(Parser, Debug)]
#[command(name = "pmguard")]
#[command(version)]
#[command(
    about = "Scan every package an install would pull in for malware before running it",
    long_about = None
)]
pub struct Args {
    /// Path to a pmguard.config.yml file (defaults to ./pmguard.config.yml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scan and ask for confirmation, but never run the package manager
    #[arg(long)]
    pub dry_run: bool,

    /// Number of concurrent analysis workers
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Capacity of the analysis work queue
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Per-package scan timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep scanning the remaining packages when one fails to resolve or fetch
    #[arg(long)]
    pub skip_failed_roots: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Package manager to run: npm, pnpm, yarn, pip or pip3
    pub manager: PackageManager,

    /// Package manager subcommand, e.g. install
    pub action: String,

    /// Arguments passed to the package manager unchanged
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Args {
    /// The package-manager invocation these arguments describe
    pub fn install_command(&self) -> InstallCommand {
        InstallCommand::new(self.manager, self.action.clone(), self.args.clone())
    }

    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            queue_capacity: self.queue_capacity,
            analysis_workers: self.workers,
            scan_timeout_secs: self.timeout,
            skip_failed_roots: self.skip_failed_roots,
        }
    }

    /// Default log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
