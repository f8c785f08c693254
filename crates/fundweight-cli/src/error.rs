//! CLI error types.

use std::path::PathBuf;

use fundweight_core::WeightError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A record does not have the expected shape.
    #[error("Incorrect data format at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the input file.
        line: u64,
        /// What is wrong with the record.
        reason: String,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid {field} at line {line}: '{value}'")]
    InvalidNumber {
        /// 1-based line number in the input file.
        line: u64,
        /// Name of the field.
        field: &'static str,
        /// The raw field text.
        value: String,
    },

    /// An end value refers to a holding missing from the data file.
    #[error("End value at line {line} refers to unknown holding of '{child}' in '{parent}'")]
    UnknownHolding {
        /// 1-based line number in the end values file.
        line: u64,
        /// The holding fund.
        parent: String,
        /// The held fund.
        child: String,
    },

    /// An end values file prices the same holding twice.
    #[error(
        "Duplicate end value at line {line} for holding of '{child}' in '{parent}' (first at line {first_line})"
    )]
    DuplicateEndValue {
        /// 1-based line number of the repeat.
        line: u64,
        /// 1-based line number of the first value.
        first_line: u64,
        /// The holding fund.
        parent: String,
        /// The held fund.
        child: String,
    },

    /// An end value targets a holding already priced in the data file.
    #[error(
        "End value at line {line} conflicts with the market value of '{child}' in '{parent}' from the data file"
    )]
    MarketValueConflict {
        /// 1-based line number in the end values file.
        line: u64,
        /// The holding fund.
        parent: String,
        /// The held fund.
        child: String,
    },

    /// The data file contained no holdings.
    #[error("No funds to act on in {}", .0.display())]
    EmptyInput(PathBuf),

    /// Cannot open or read a file.
    #[error("Cannot open file {}: {source}", .path.display())]
    File {
        /// The file path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Structural error in the holdings.
    #[error(transparent)]
    Weight(#[from] WeightError),

    /// CSV reader or writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CliError {
    /// Create a malformed record error.
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Returns true for errors in a single record that lenient reading may skip.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::InvalidNumber { .. }
        )
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
