//! Weights command implementation.
//!
//! Resolves the weight, and where market values allow the weighted return,
//! of every base fund in every root fund.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Args;
use tracing::{debug, info, warn};

use fundweight_core::{resolve, HoldingsGraph, Resolution};

use crate::cli::OutputFormat;
use crate::config::{CalculatorConfig, MAX_PRECISION};
use crate::input::{apply_end_values, read_end_values_file, read_holdings_file};
use crate::output::{format_records_csv, print_header, print_json, print_table, SummaryRow, WeightRow};

/// Arguments for the weights command.
#[derive(Args, Debug)]
pub struct WeightsArgs {
    /// Holdings file: parent, child, book_value[, market_value]
    pub data_file: PathBuf,

    /// Market values file: parent, child, market_value
    #[arg(short, long)]
    pub end_values: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Decimal places for weights and returns
    #[arg(short, long)]
    pub precision: Option<usize>,

    /// Print a header line before CSV records
    #[arg(long)]
    pub header: bool,

    /// Skip malformed records instead of failing
    #[arg(long)]
    pub skip_invalid: bool,
}

/// Settings for one run, after flags are applied over the configuration.
#[derive(Debug, Clone, Copy)]
struct Settings {
    format: OutputFormat,
    precision: usize,
    header: bool,
    skip_invalid: bool,
    warn_multiple_roots: bool,
}

impl Settings {
    fn new(args: &WeightsArgs, config: &CalculatorConfig) -> Result<Self> {
        let precision = args.precision.unwrap_or(config.precision);
        ensure!(
            precision <= MAX_PRECISION,
            "precision must be at most {MAX_PRECISION}, got {precision}"
        );
        Ok(Self {
            format: args.format.unwrap_or(config.format),
            precision,
            header: args.header || config.header,
            skip_invalid: args.skip_invalid || config.skip_invalid_records,
            warn_multiple_roots: config.warn_multiple_roots,
        })
    }
}

/// Execute the weights command.
pub fn execute(args: WeightsArgs, config: &CalculatorConfig) -> Result<()> {
    let settings = Settings::new(&args, config)?;
    debug!(?settings, "Resolved settings");

    let graph = load_graph(&args, &settings)?;
    let roots = graph.roots();
    if roots.len() > 1 && settings.warn_multiple_roots {
        let names: Vec<&str> = roots.iter().map(|r| r.as_str()).collect();
        warn!("Multiple roots found: {}", names.join(", "));
    }

    let resolution = resolve(&graph)?;
    info!(
        funds = graph.fund_count(),
        holdings = graph.holding_count(),
        records = resolution.records().len(),
        "Resolved weights"
    );

    write_output(&resolution, &settings)
}

fn load_graph(args: &WeightsArgs, settings: &Settings) -> Result<HoldingsGraph> {
    let holdings = read_holdings_file(&args.data_file, settings.skip_invalid)?;
    let mut graph = HoldingsGraph::from_holdings(holdings)?;

    if let Some(path) = &args.end_values {
        let values = read_end_values_file(path, settings.skip_invalid)?;
        apply_end_values(&mut graph, &values)?;
    }

    Ok(graph)
}

fn write_output(resolution: &Resolution, settings: &Settings) -> Result<()> {
    match settings.format {
        OutputFormat::Csv => {
            let csv = format_records_csv(resolution.records(), settings.precision, settings.header)?;
            print!("{csv}");
        }
        OutputFormat::Table => {
            let rows: Vec<WeightRow> = resolution
                .records()
                .iter()
                .map(|r| WeightRow::from_record(r, settings.precision))
                .collect();
            print_header("Base Fund Weights");
            print_table(&rows);

            let summaries: Vec<SummaryRow> =
                resolution.summaries().iter().map(SummaryRow::from).collect();
            print_header("Root Funds");
            print_table(&summaries);
        }
        OutputFormat::Json => print_json(resolution)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> WeightsArgs {
        WeightsArgs {
            data_file: PathBuf::from("data.csv"),
            end_values: None,
            format: None,
            precision: None,
            header: false,
            skip_invalid: false,
        }
    }

    #[test]
    fn test_settings_follow_config() {
        let config = CalculatorConfig {
            precision: 5,
            format: OutputFormat::Json,
            skip_invalid_records: true,
            ..CalculatorConfig::default()
        };
        let settings = Settings::new(&args(), &config).unwrap();
        assert_eq!(settings.precision, 5);
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(settings.skip_invalid);
        assert!(!settings.header);
    }

    #[test]
    fn test_flags_override_config() {
        let args = WeightsArgs {
            format: Some(OutputFormat::Table),
            precision: Some(1),
            header: true,
            ..args()
        };
        let settings = Settings::new(&args, &CalculatorConfig::default()).unwrap();
        assert_eq!(settings.precision, 1);
        assert_eq!(settings.format, OutputFormat::Table);
        assert!(settings.header);
    }

    #[test]
    fn test_rejects_excess_precision() {
        let args = WeightsArgs {
            precision: Some(MAX_PRECISION + 1),
            ..args()
        };
        assert!(Settings::new(&args, &CalculatorConfig::default()).is_err());
    }
}
