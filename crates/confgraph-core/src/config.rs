//! Configuration management for confgraph binaries.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`CONFGRAPH__` prefix, `__` separator)
//! 2. Config file (`confgraph.toml`, `.json` or `.yaml`)
//! 3. Defaults supplied by each section's type

use config::{Config, Environment, File};

use crate::error::CoreError;

/// Environment variable prefix shared by every confgraph binary.
pub const ENV_PREFIX: &str = "CONFGRAPH";

/// Default config file prefix (`confgraph.toml`).
pub const DEFAULT_FILE_PREFIX: &str = "confgraph";

/// Build the layered configuration for the given file prefix.
///
/// The file is optional; a missing file yields a configuration made up of
/// environment overrides only.
pub fn layered(file_prefix: &str) -> Result<Config, CoreError> {
    let cfg = Config::builder()
        .add_source(File::with_name(file_prefix).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    Ok(cfg)
}

/// Deserialize one section, falling back to its `Default` when the section
/// is absent.
pub fn section<T>(cfg: &Config, key: &str) -> Result<T, CoreError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match cfg.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(CoreError::Config(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        name: String,
        #[serde(default)]
        retries: u32,
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let cfg = layered("definitely-not-a-confgraph-file").unwrap();
        let sample: Sample = section(&cfg, "sample").unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_section_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.toml"),
            "[sample]\nname = \"program\"\nretries = 3\n",
        )
        .unwrap();

        let prefix = dir.path().join("settings");
        let cfg = layered(prefix.to_str().unwrap()).unwrap();
        let sample: Sample = section(&cfg, "sample").unwrap();
        assert_eq!(sample.name, "program");
        assert_eq!(sample.retries, 3);
    }
}
