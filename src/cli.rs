//! CLI argument parsing module for ripple

use crate::error::ConfigError;
use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string in format: Ns (seconds), Nm (minutes), Nh (hours)
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    let trimmed = s.trim();
    let (num_str, multiplier) = if let Some(n) = trimmed.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = trimmed.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = trimmed.strip_suffix('h') {
        (n, 60 * 60)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    let seconds = num.checked_mul(multiplier).ok_or_else(invalid)?;

    Ok(Duration::from_secs(seconds))
}

/// Find the Go packages affected by changes since a baseline revision
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ripple",
    version,
    about = "Find the Go packages affected by changes since a baseline revision"
)]
pub struct CliArgs {
    /// Go module root, the directory holding go.mod (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Baseline revision to compare against [default: origin/main]
    #[arg(short, long)]
    pub base: Option<String>,

    /// Output format [default: plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Abort when the analysis takes longer than this (e.g., 30s, 5m, 1h)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Also treat sub-package imports of a changed module as affected
    #[arg(long)]
    pub match_module_prefix: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - no progress spinner
    #[arg(short, long)]
    pub quiet: bool,
}
