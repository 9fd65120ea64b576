//! ripple - change impact analysis CLI for Go modules

use clap::Parser;
use ripple::cli::CliArgs;
use ripple::config::Settings;
use ripple::engine::ImpactEngine;
use ripple::external::{GitCli, GoCli};
use ripple::output::create_formatter;
use ripple::progress::Progress;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "RIPPLE_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only the rendered report
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("ripple=debug")
        } else {
            EnvFilter::new("ripple=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let settings = Settings::resolve(&args)?;
    tracing::debug!(
        path = %settings.project_dir.display(),
        base = %settings.base,
        "ripple v{}",
        env!("CARGO_PKG_VERSION")
    );

    let color = !settings.no_color && io::stdout().is_terminal();
    colored::control::set_override(color);

    let progress = Progress::new(
        format!("Analyzing changes since {}", settings.base),
        !settings.quiet && io::stderr().is_terminal(),
    );
    let engine = ImpactEngine::new(
        GitCli::new(&settings.project_dir),
        GoCli::new(&settings.project_dir),
        settings.engine_settings(),
    )
    .with_progress(progress);

    let report = engine.compute_impact(&settings.base).await?;

    let formatter = create_formatter(settings.output_config(color));
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
