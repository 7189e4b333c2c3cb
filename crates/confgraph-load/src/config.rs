//! Configuration for the confgraph-load batch job.

use serde::Deserialize;

use confgraph_core::config::{layered, section};
use confgraph_graph::GraphConfig;

use crate::error::{LoadError, Result};

/// Top-level load configuration.
///
/// Loaded from the `[load]` section of `confgraph.toml` or
/// `CONFGRAPH__LOAD__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    /// Path to the program export (JSON array of session records).
    #[serde(default = "default_input")]
    pub input: String,

    /// What to do with a record that has no session identifier.
    #[serde(default)]
    pub on_missing_id: MissingIdPolicy,

    /// Where to write the JSON run summary, if anywhere.
    #[serde(default)]
    pub report_path: Option<String>,
}

/// Handling of records without a session identifier.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MissingIdPolicy {
    /// Log a warning, list the record in the run summary and continue.
    #[default]
    Skip,
    /// Stop the run at the offending record.
    Abort,
}

impl std::str::FromStr for MissingIdPolicy {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            _ => Err(LoadError::Config(format!(
                "Invalid missing-id policy: {s}. Choose: skip, abort"
            ))),
        }
    }
}

fn default_input() -> String {
    "data/program.json".to_string()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            on_missing_id: MissingIdPolicy::default(),
            report_path: None,
        }
    }
}

/// Load the `[load]` and `[neo4j]` sections for the given file prefix.
pub fn load_settings(file_prefix: &str) -> Result<(LoadConfig, GraphConfig)> {
    let cfg = layered(file_prefix).map_err(|e| LoadError::Config(e.to_string()))?;
    let load = section::<LoadConfig>(&cfg, "load").map_err(|e| LoadError::Config(e.to_string()))?;
    let graph =
        section::<GraphConfig>(&cfg, "neo4j").map_err(|e| LoadError::Config(e.to_string()))?;
    Ok((load, graph))
}
