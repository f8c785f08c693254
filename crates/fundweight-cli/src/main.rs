//! Fundweight CLI - Look-through weights of base funds in portfolios of funds.
//!
//! # Usage
//!
//! ```bash
//! # Weights of every base fund in every root fund
//! fundweight weights data.csv
//!
//! # Weights and returns, with market values from a second file
//! fundweight weights data.csv --end-values end_values.csv -f table
//!
//! # Check a holdings file for cycles
//! fundweight inspect data.csv
//!
//! # Write a default configuration file
//! fundweight config init
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod input;
mod output;

use cli::{Cli, Commands};
use config::CalculatorConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Weights(args) => {
            let config = CalculatorConfig::load(cli.config.as_deref())?;
            commands::weights::execute(args, &config)?
        }
        Commands::Inspect(args) => {
            let config = CalculatorConfig::load(cli.config.as_deref())?;
            commands::inspect::execute(args, &config)?
        }
        Commands::Config(args) => commands::config::execute(args, cli.config)?,
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();
}
