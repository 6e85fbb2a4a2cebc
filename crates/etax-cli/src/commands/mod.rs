//! Subcommands and the helpers they share.

pub mod classify;
pub mod config;
pub mod encode;
pub mod lists;
pub mod resolve;
pub mod scan;

use std::path::{Path, PathBuf};

use etax_core::{CodeRecord, CodeRegistry, EtaxConfig};
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Outcome of resolving one input value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Resolved,
    Placeholder,
    Absent,
}

impl Status {
    pub fn of(record: Option<&CodeRecord>) -> Self {
        match record {
            Some(r) if r.is_resolved() => Self::Resolved,
            Some(_) => Self::Placeholder,
            None => Self::Absent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::Placeholder => "placeholder",
            Self::Absent => "absent",
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("etax")
        .join("config.json")
}

/// Load the config given on the command line, else the default file if it
/// exists, else defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EtaxConfig> {
    if let Some(path) = path {
        debug!("Loading config from {}", path.display());
        return Ok(EtaxConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(EtaxConfig::from_file(&default_path)?)
    } else {
        Ok(EtaxConfig::default())
    }
}

pub fn load_registry(config_path: Option<&Path>) -> anyhow::Result<(EtaxConfig, CodeRegistry)> {
    let config = load_config(config_path)?;
    let registry = CodeRegistry::from_config(&config)?;
    Ok((config, registry))
}
