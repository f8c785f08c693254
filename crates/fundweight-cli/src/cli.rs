//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::commands::{ConfigArgs, InspectArgs, WeightsArgs};

/// Fundweight - Look-through weights of base funds in portfolios of funds
#[derive(Parser)]
#[command(name = "fundweight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/fundweight/config.toml)
    #[arg(short, long, global = true, env = "FUNDWEIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Calculate the weight (and return) of every base fund in every root fund
    Weights(WeightsArgs),

    /// Summarize a holdings file and check it for cycles
    Inspect(InspectArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated records: root,base,weight[,weighted_return]
    #[default]
    Csv,
    /// Human-readable table format
    Table,
    /// JSON format
    Json,
}
