//! CSV input.
//!
//! Holdings files carry one holding per line, `parent, child, book_value` with
//! an optional fourth `market_value` column. End values files carry
//! `parent, child, market_value` for holdings defined elsewhere. There is no
//! header line and whitespace around fields is ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use fundweight_core::{FundId, Holding, HoldingsGraph};
use tracing::{debug, warn};

use crate::error::{CliError, CliResult};

/// Market value of an existing holding.
#[derive(Debug, Clone, PartialEq)]
pub struct EndValue {
    /// Line the value was read from.
    pub line: u64,
    /// The holding fund.
    pub parent: String,
    /// The held fund.
    pub child: String,
    /// Market value of the holding.
    pub market_value: f64,
}

/// Reads holdings from a file.
pub fn read_holdings_file(path: &Path, skip_invalid: bool) -> CliResult<Vec<Holding>> {
    let holdings = read_holdings(open(path)?, skip_invalid)?;
    if holdings.is_empty() {
        return Err(CliError::EmptyInput(path.to_path_buf()));
    }
    debug!(path = %path.display(), count = holdings.len(), "Read holdings");
    Ok(holdings)
}

/// Reads end values from a file.
pub fn read_end_values_file(path: &Path, skip_invalid: bool) -> CliResult<Vec<EndValue>> {
    let values = read_end_values(open(path)?, skip_invalid)?;
    debug!(path = %path.display(), count = values.len(), "Read end values");
    Ok(values)
}

/// Reads holdings records.
pub fn read_holdings<R: Read>(reader: R, skip_invalid: bool) -> CliResult<Vec<Holding>> {
    read_records(reader, skip_invalid, parse_holding)
}

/// Reads end value records.
pub fn read_end_values<R: Read>(reader: R, skip_invalid: bool) -> CliResult<Vec<EndValue>> {
    read_records(reader, skip_invalid, parse_end_value)
}

/// Sets the market value of every holding named in `values`.
///
/// Each holding may be priced once: a pair repeated in `values`, or a holding
/// whose market value came from the data file, is an error. Nothing is
/// applied unless every value matches a holding.
pub fn apply_end_values(graph: &mut HoldingsGraph, values: &[EndValue]) -> CliResult<()> {
    let mut seen: HashMap<(FundId, FundId), u64> = HashMap::new();
    let mut resolved = Vec::with_capacity(values.len());

    for value in values {
        let parent = FundId::from(value.parent.as_str());
        let child = FundId::from(value.child.as_str());

        let Some(holding) = graph.holding(&parent, &child) else {
            return Err(CliError::UnknownHolding {
                line: value.line,
                parent: value.parent.clone(),
                child: value.child.clone(),
            });
        };
        if holding.market_value.is_some() {
            return Err(CliError::MarketValueConflict {
                line: value.line,
                parent: value.parent.clone(),
                child: value.child.clone(),
            });
        }
        if let Some(&first_line) = seen.get(&(parent.clone(), child.clone())) {
            return Err(CliError::DuplicateEndValue {
                line: value.line,
                first_line,
                parent: value.parent.clone(),
                child: value.child.clone(),
            });
        }
        seen.insert((parent.clone(), child.clone()), value.line);
        resolved.push((parent, child, value.market_value));
    }

    for (parent, child, market_value) in resolved {
        graph.set_market_value(&parent, &child, market_value)?;
    }
    debug!(count = values.len(), "Applied end values");
    Ok(())
}

fn open(path: &Path) -> CliResult<File> {
    File::open(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

fn read_records<R, T, F>(reader: R, skip_invalid: bool, parse: F) -> CliResult<Vec<T>>
where
    R: Read,
    F: Fn(&StringRecord, u64) -> CliResult<T>,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut parsed = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        match parse(&record, line) {
            Ok(item) => parsed.push(item),
            Err(err) if skip_invalid && err.is_record_error() => {
                warn!("Skipping record: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(parsed)
}

fn parse_holding(record: &StringRecord, line: u64) -> CliResult<Holding> {
    if !(3..=4).contains(&record.len()) {
        return Err(CliError::malformed(
            line,
            format!("expected 3 or 4 fields, found {}", record.len()),
        ));
    }
    let (parent, child) = fund_pair(record, line)?;
    let book_value = parse_number(&record[2], "book_value", line)?;
    let mut holding = Holding::new(parent, child, book_value);
    if let Some(raw) = record.get(3) {
        holding.market_value = Some(parse_number(raw, "market_value", line)?);
    }
    Ok(holding)
}

fn parse_end_value(record: &StringRecord, line: u64) -> CliResult<EndValue> {
    if record.len() != 3 {
        return Err(CliError::malformed(
            line,
            format!("expected 3 fields, found {}", record.len()),
        ));
    }
    let (parent, child) = fund_pair(record, line)?;
    Ok(EndValue {
        line,
        parent: parent.to_string(),
        child: child.to_string(),
        market_value: parse_number(&record[2], "market_value", line)?,
    })
}

fn fund_pair(record: &StringRecord, line: u64) -> CliResult<(&str, &str)> {
    let (parent, child) = (&record[0], &record[1]);
    if parent.is_empty() || child.is_empty() {
        return Err(CliError::malformed(line, "empty fund name"));
    }
    Ok((parent, child))
}

fn parse_number(raw: &str, field: &'static str, line: u64) -> CliResult<f64> {
    let invalid = || CliError::InvalidNumber {
        line,
        field,
        value: raw.to_string(),
    };
    let value: f64 = raw.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}
