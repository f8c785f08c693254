//! Inspect command implementation.
//!
//! Summarizes a holdings file and checks it for cycles without resolving
//! weights.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use fundweight_core::{validate, FundId, HoldingsGraph};

use crate::cli::OutputFormat;
use crate::config::CalculatorConfig;
use crate::input::read_holdings_file;
use crate::output::{print_error, print_header, print_json, print_success, print_table, KeyValue};

/// Arguments for the inspect command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Holdings file: parent, child, book_value[, market_value]
    pub data_file: PathBuf,

    /// Output format; csv prints the same table as table
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip malformed records instead of failing
    #[arg(long)]
    pub skip_invalid: bool,
}

/// How many holdings carry a market value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum MarketValues {
    All,
    Partial,
    None,
}

impl MarketValues {
    fn of(graph: &HoldingsGraph) -> Self {
        let priced = graph
            .holdings()
            .filter(|h| h.market_value.is_some())
            .count();
        match priced {
            0 => Self::None,
            n if n == graph.holding_count() => Self::All,
            _ => Self::Partial,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Partial => "partial",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    funds: usize,
    holdings: usize,
    roots: Vec<FundId>,
    bases: Vec<FundId>,
    market_values: MarketValues,
    valid: bool,
    cycle: Option<Vec<FundId>>,
}

impl Report {
    fn key_values(&self) -> Vec<KeyValue> {
        let mut rows = vec![
            KeyValue::new("Funds", self.funds.to_string()),
            KeyValue::new("Holdings", self.holdings.to_string()),
            KeyValue::new("Roots", join(&self.roots)),
            KeyValue::new("Bases", join(&self.bases)),
            KeyValue::new("Market values", self.market_values.as_str()),
        ];
        if let Some(path) = &self.cycle {
            rows.push(KeyValue::new("Cycle", join_path(path)));
        }
        rows
    }
}

fn join(funds: &[FundId]) -> String {
    if funds.is_empty() {
        return "-".to_string();
    }
    funds.iter().map(FundId::as_str).collect::<Vec<_>>().join(", ")
}

fn join_path(funds: &[FundId]) -> String {
    funds.iter().map(FundId::as_str).collect::<Vec<_>>().join(" -> ")
}

/// Execute the inspect command.
pub fn execute(args: InspectArgs, config: &CalculatorConfig) -> Result<()> {
    let skip_invalid = args.skip_invalid || config.skip_invalid_records;
    let holdings = read_holdings_file(&args.data_file, skip_invalid)?;
    let graph = HoldingsGraph::from_holdings(holdings)?;

    let outcome = validate(&graph);
    let report = Report {
        funds: graph.fund_count(),
        holdings: graph.holding_count(),
        roots: graph.roots().into_iter().cloned().collect(),
        bases: graph.bases().into_iter().cloned().collect(),
        market_values: MarketValues::of(&graph),
        valid: outcome.is_ok(),
        cycle: outcome
            .as_ref()
            .err()
            .and_then(|e| e.cycle_path())
            .map(<[FundId]>::to_vec),
    };

    match args.format.unwrap_or(config.format) {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table | OutputFormat::Csv => {
            print_header("Holdings");
            print_table(&report.key_values());
            match &outcome {
                Ok(_) => print_success("No cycles found"),
                Err(err) => print_error(&err.to_string()),
            }
        }
    }

    outcome?;
    Ok(())
}
