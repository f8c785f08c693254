//! Calculator configuration.
//!
//! Settings are read from a TOML file; command-line flags override them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::{CliError, CliResult};

/// Largest number of decimal places accepted for output.
pub const MAX_PRECISION: usize = 12;

/// Calculator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// Decimal places for weights and returns
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Skip malformed records with a warning instead of failing
    #[serde(default)]
    pub skip_invalid_records: bool,

    /// Warn when the holdings contain more than one root fund
    #[serde(default = "default_true")]
    pub warn_multiple_roots: bool,

    /// Print a header line before CSV output
    #[serde(default)]
    pub header: bool,
}

fn default_precision() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            format: OutputFormat::default(),
            skip_invalid_records: false,
            warn_multiple_roots: true,
            header: false,
        }
    }
}

impl CalculatorConfig {
    /// Reads a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> CliResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CliError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(content: &str) -> CliResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// if a file is there, otherwise built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "Loading configuration");
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            _ => {
                debug!("Using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    fn validate(&self) -> CliResult<()> {
        if self.precision > MAX_PRECISION {
            return Err(CliError::Config(format!(
                "precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// Default configuration file location.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join("fundweight").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.precision, 3);
        assert_eq!(config.format, OutputFormat::Csv);
        assert!(!config.skip_invalid_records);
        assert!(config.warn_multiple_roots);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = CalculatorConfig::from_toml("precision = 5\nformat = \"json\"\n").unwrap();
        assert_eq!(config.precision, 5);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.warn_multiple_roots);
        assert!(!config.header);
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert!(matches!(
            CalculatorConfig::from_toml("precision = 40"),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(CalculatorConfig::from_toml("format = \"xml\"").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = CalculatorConfig {
            precision: 6,
            skip_invalid_records: true,
            ..CalculatorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(CalculatorConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            CalculatorConfig::load(Some(&path)),
            Err(CliError::File { .. })
        ));
    }
}
