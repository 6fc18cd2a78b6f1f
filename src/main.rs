//! resynth-verify CLI
//!
//! Command-line interface for validating resynthesized audio.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use resynth_verify::cli::{commands, Cli, Commands};
use resynth_verify::{AnalysisConfig, Result};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("resynth-verify v{}", env!("CARGO_PKG_VERSION"));

    let config = cli
        .load_config()
        .context("Failed to load configuration")?;

    if let Err(err) = handle_command(cli.command, &config) {
        for hint in err.recovery_suggestions() {
            eprintln!("hint: {}", hint);
        }
        let code = err.error_code();
        return Err(anyhow::Error::new(err).context(format!("Command failed ({})", code)));
    }

    Ok(())
}

fn handle_command(cmd: Commands, config: &AnalysisConfig) -> Result<()> {
    match cmd {
        Commands::Extract { input, output } => commands::extract(&input, &output, config),
        Commands::Inspect { input } => commands::inspect(&input),
        Commands::Compare {
            original,
            resynthesized,
            svg,
            json,
        } => commands::compare(
            &original,
            &resynthesized,
            svg.as_deref(),
            json.as_deref(),
            config,
        ),
    }
}
