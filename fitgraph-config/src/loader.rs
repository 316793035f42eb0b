//! Configuration loading utilities

use crate::Config;
use fitgraph_common::Result as FitGraphResult;
use std::env;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for fitgraph_common::FitGraphError {
    fn from(err: ConfigError) -> Self {
        fitgraph_common::FitGraphError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all().map_err(ConfigError::ValidationError)?;

        Ok(config)
    }

    /// Load configuration from environment variables and well-known files
    pub fn load() -> FitGraphResult<Config> {
        let config = if let Ok(config_path) = env::var("FITGRAPH_CONFIG_PATH") {
            Self::load_config(&config_path)?
        } else if Path::new("fitgraph.yaml").exists() {
            Self::load_config("fitgraph.yaml")?
        } else if Path::new("fitgraph.yml").exists() {
            Self::load_config("fitgraph.yml")?
        } else {
            // No config file found, use defaults with env overrides
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FitGraphResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = env::var("SERVER_PORT") {
            config.server.port = Self::parse_env("SERVER_PORT", &port)?;
        }

        if let Ok(timeout) = env::var("SERVER_REQUEST_TIMEOUT") {
            config.server.request_timeout_seconds =
                Self::parse_env("SERVER_REQUEST_TIMEOUT", &timeout)?;
        }

        if let Ok(max_bytes) = env::var("UPLOAD_MAX_FILE_BYTES") {
            config.upload.max_file_bytes = Self::parse_env("UPLOAD_MAX_FILE_BYTES", &max_bytes)?;
        }

        if let Ok(max_files) = env::var("UPLOAD_MAX_FILES") {
            config.upload.max_files = Self::parse_env("UPLOAD_MAX_FILES", &max_files)?;
        }

        if let Ok(width) = env::var("CHART_WIDTH") {
            config.chart.width = Self::parse_env("CHART_WIDTH", &width)?;
        }

        if let Ok(height) = env::var("CHART_HEIGHT") {
            config.chart.height = Self::parse_env("CHART_HEIGHT", &height)?;
        }

        if let Ok(bg_color) = env::var("CHART_BACKGROUND_COLOR") {
            config.chart.background_color = bg_color;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(file) = env::var("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }

    fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        value.parse().map_err(|e: T::Err| ConfigError::EnvParseError {
            var: var.to_string(),
            source: Box::new(e),
        })
    }
}
