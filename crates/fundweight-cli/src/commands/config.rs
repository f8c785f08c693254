//! Config command implementation.
//!
//! Shows, locates and initializes the calculator configuration file.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};

use crate::config::{default_path, CalculatorConfig};
use crate::output::print_success;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration as TOML
    Show,

    /// Show configuration file location
    Path,

    /// Write a configuration file with default settings
    Init(InitArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
///
/// `explicit` is the `--config` path, which takes the place of the default
/// location.
pub fn execute(args: ConfigArgs, explicit: Option<PathBuf>) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = CalculatorConfig::load(explicit.as_deref())?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", config_path(explicit)?.display());
            Ok(())
        }
        ConfigCommand::Init(init) => execute_init(init, config_path(explicit)?),
    }
}

fn execute_init(args: InitArgs, path: PathBuf) -> Result<()> {
    if path.exists() && !args.force {
        bail!(
            "Configuration file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    CalculatorConfig::default().save(&path)?;
    print_success(&format!("Wrote {}", path.display()));
    Ok(())
}

fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    explicit
        .or_else(default_path)
        .ok_or_else(|| anyhow!("Could not determine config directory"))
}
