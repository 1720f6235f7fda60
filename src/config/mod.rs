//! Layered configuration for primeshard
//!
//! Settings resolve from four layers, lowest priority first: the embedded
//! `default-config.toml`, a `primeshard.toml` / `primeshard.json` in the
//! working directory (or the file named with `--config`), `PRIMESHARD_*`
//! environment variables, and finally command-line flags applied by the
//! command layer.

use std::path::PathBuf;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSection {
    /// Inclusive lower bound of the search space.
    pub lower: u64,
    /// Exclusive upper bound of the search space.
    pub upper: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            lower: 0,
            upper: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkersSection {
    /// Compute workers; 0 means one per available core.
    pub count: usize,
    /// Writer threads in the persistence pool.
    pub io_threads: usize,
}

impl Default for WorkersSection {
    fn default() -> Self {
        Self {
            count: 0,
            io_threads: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory that receives one file per partition.
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("prime_output"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PrimeshardConfig {
    pub search: SearchSection,
    pub workers: WorkersSection,
    pub output: OutputSection,
}

impl PrimeshardConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If a custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            figment = if custom_path.ends_with(".json") {
                figment.merge(Json::file(custom_path))
            } else {
                figment.merge(Toml::file(custom_path))
            };
        } else {
            figment = figment
                .merge(Toml::file("primeshard.toml"))
                .merge(Json::file("primeshard.json"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("PRIMESHARD_").split("__"));

        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_load() {
        let config = PrimeshardConfig::load().expect("default config should load");
        assert_eq!(config.search.lower, 0);
        assert!(config.search.upper > config.search.lower);
        assert!(config.workers.io_threads >= 1);
    }

    #[test]
    fn test_embedded_defaults_match_struct_defaults() {
        let from_file: PrimeshardConfig = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .unwrap();
        assert_eq!(from_file, PrimeshardConfig::default());
    }

    #[test]
    fn test_custom_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[search]\nupper = 5000\n\n[workers]\ncount = 3\n"
        )
        .unwrap();

        let config =
            PrimeshardConfig::load_with_custom_config(Some(file.path().to_str().unwrap()))
                .unwrap();
        assert_eq!(config.search.upper, 5000);
        assert_eq!(config.workers.count, 3);
        // Untouched sections keep their defaults
        assert_eq!(config.output.dir, PathBuf::from("prime_output"));
    }
}
