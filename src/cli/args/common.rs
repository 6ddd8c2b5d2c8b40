//! Common CLI types shared across commands

use std::str::FromStr;

use crate::error::ConfigError;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - result cards and detail views (default)
    #[default]
    Pretty,
    /// Table format - one row per company
    Table,
    /// JSON format - structured for scripts
    Json,
}

/// Parses the `preferences.format` config value.
impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "unknown output format '{}' (expected pretty, table or json)",
                other
            ))),
        }
    }
}
