//! Output formatting utilities.

use colored::Colorize;
use fundweight_core::{RootSummary, WeightRecord};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::error::{CliError, CliResult};

/// Formats records as CSV lines: `root,base,weight[,weighted_return]`.
///
/// The return column is written only for records that have one.
pub fn format_records_csv(
    records: &[WeightRecord],
    precision: usize,
    header: bool,
) -> CliResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    if header {
        let mut columns = vec!["root", "base", "weight"];
        if records.iter().any(|r| r.weighted_return.is_some()) {
            columns.push("weighted_return");
        }
        wtr.write_record(&columns)?;
    }

    for record in records {
        let mut fields = vec![
            record.root.to_string(),
            record.base.to_string(),
            format_value(record.weight, precision),
        ];
        if let Some(r) = record.weighted_return {
            fields.push(format_value(r, precision));
        }
        wtr.write_record(&fields)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| CliError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A record row for table output.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct WeightRow {
    #[tabled(rename = "Root")]
    pub root: String,
    #[tabled(rename = "Base")]
    pub base: String,
    #[tabled(rename = "Weight")]
    pub weight: String,
    #[tabled(rename = "Weighted Return")]
    pub weighted_return: String,
}

impl WeightRow {
    /// Formats a record with `precision` decimal places.
    pub fn from_record(record: &WeightRecord, precision: usize) -> Self {
        Self {
            root: record.root.to_string(),
            base: record.base.to_string(),
            weight: format_value(record.weight, precision),
            weighted_return: record
                .weighted_return
                .map_or_else(|| "-".to_string(), |r| format_value(r, precision)),
        }
    }
}

/// A root summary row for table output.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Root")]
    pub root: String,
    #[tabled(rename = "Book Value")]
    pub book_value: String,
    #[tabled(rename = "Market Value")]
    pub market_value: String,
    #[tabled(rename = "Base Funds")]
    pub base_count: usize,
}

impl From<&RootSummary> for SummaryRow {
    fn from(summary: &RootSummary) -> Self {
        Self {
            root: summary.root.to_string(),
            book_value: format!("{:.2}", summary.total_book_value),
            market_value: summary
                .total_market_value
                .map_or_else(|| "-".to_string(), |v| format!("{v:.2}")),
            base_count: summary.base_count,
        }
    }
}

/// Formats a number with a fixed number of decimal places.
pub fn format_value(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Prints data as a formatted table.
pub fn print_table<T: Tabled>(data: &[T]) {
    if data.is_empty() {
        println!("No results.");
        return;
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
}

/// Prints data as JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}
