//! Configuration management for tripfetch
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! Command-line flags are applied on top by the binary.
//!
//! # Usage
//!
//! ```no_run
//! use tripfetch::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Fetching {} files", config.source.range().len());
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `TRIPFETCH__<section>__<key>`:
//! - `TRIPFETCH__POOL__WORKERS=16`
//! - `TRIPFETCH__SOURCE__START_YEAR=2019`
//! - `TRIPFETCH__OUTPUT__DIR=/data/trips`
//!
//! # Configuration File
//!
//! Loaded from `config/tripfetch.toml` unless a path is given explicitly or
//! `TRIPFETCH_CONFIG` is set. A missing file is not an error: with no file
//! and no environment the built-in defaults apply.

mod models;
mod sources;
mod validation;

pub use models::{
    Config, DEFAULT_END_YEAR, DEFAULT_START_YEAR, DEFAULT_URL_TEMPLATE, DEFAULT_WORKERS,
    HttpSettings, OutputConfig, PoolConfig, SourceConfig,
};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// `path` takes precedence over `TRIPFETCH_CONFIG` and the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = Self::load_layers(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge file and environment layers without validating
    ///
    /// For callers that apply further overrides (command-line flags) and
    /// validate the final result themselves.
    pub fn load_layers(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Ok(sources::load(path)?)
    }

    /// Load configuration from a specific path plus environment
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[pool]\nworkers = 4\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.pool.workers, 4);
        assert_eq!(config.source.range().len(), 13 * 12);
    }

    #[test]
    fn test_validation_runs_after_loading() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[source]
start_year = 2021
end_year = 2020
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_load_layers_defers_validation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[pool]\nworkers = 0\n").unwrap();

        let mut config = Config::load_layers(Some(config_path.clone())).unwrap();
        assert_eq!(config.pool.workers, 0);
        assert!(matches!(config.validate(), Err(ValidationError::NoWorkers)));

        config.pool.workers = 4;
        assert!(config.validate().is_ok());

        assert!(Config::load(Some(config_path)).is_err());
    }

    #[test]
    fn test_full_config_example() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[source]
url_template = "https://mirror.example.com/green/{year}/green_tripdata_{year}-{month}.parquet"
start_year = 2015
end_year = 2016

[pool]
workers = 12
handoff_capacity = 2

[http]
connect_timeout_secs = 5
request_timeout_secs = 600
user_agent = "trip-mirror/1.0"

[output]
dir = "/var/lib/trips"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();

        let urls: Vec<String> = config.source.urls().collect();
        assert_eq!(urls.len(), 24);
        assert_eq!(
            urls[0],
            "https://mirror.example.com/green/2015/green_tripdata_2015-01.parquet"
        );
        assert_eq!(
            urls[23],
            "https://mirror.example.com/green/2016/green_tripdata_2016-12.parquet"
        );

        let http = config.http.to_http_config();
        assert_eq!(http.connect_timeout.as_secs(), 5);
        assert_eq!(http.request_timeout.map(|d| d.as_secs()), Some(600));
        assert_eq!(http.user_agent, "trip-mirror/1.0");
        assert_eq!(config.pool.handoff_capacity, 2);
    }

    #[test]
    fn test_config_from_toml_string() {
        let config: Config = toml::from_str("[output]\ndir = \"downloads\"\n").unwrap();
        assert_eq!(config.output.dir, PathBuf::from("downloads"));
        assert_eq!(config.pool.workers, DEFAULT_WORKERS);
        assert!(config.http.to_http_config().request_timeout.is_none());
    }
}
