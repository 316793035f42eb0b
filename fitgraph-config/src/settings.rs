//! Application configuration structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    #[validate]
    pub server: ServerConfig,

    /// Upload limits
    #[validate]
    pub upload: UploadConfig,

    /// Chart rendering settings
    #[validate]
    pub chart: ChartConfig,

    /// Metric aggregation settings
    #[validate]
    pub metrics: MetricsConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Port to listen on
    #[validate(range(min = 1, message = "Port must be non-zero"))]
    pub port: u16,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub request_timeout_seconds: u64,
}

/// Upload limit configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UploadConfig {
    /// Maximum size of a single uploaded file in bytes
    #[validate(range(
        min = 1024,
        max = 268435456,
        message = "Max file size must be between 1 KiB and 256 MiB"
    ))]
    pub max_file_bytes: usize,

    /// Maximum number of files per upload request
    #[validate(range(min = 1, max = 100, message = "Max files must be between 1 and 100"))]
    pub max_files: usize,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Background color must be a valid hex color"
    ))]
    pub background_color: String,

    /// Font family for text rendering
    pub font_family: String,

    /// Font size for axis labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Whether to show grid lines
    pub show_grid: bool,

    /// Whether to show the legend
    pub show_legend: bool,
}

/// Metric aggregation configuration
///
/// Aggregation kinds are fixed per metric in the built-in registry; this
/// section lets a deployment override individual metrics with `"mean"` or
/// `"sum"`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct MetricsConfig {
    /// Per-metric aggregation overrides, e.g. `restingHeartRate: mean`
    #[validate(custom(
        function = "crate::validation::validate_aggregation_overrides",
        message = "Aggregation kind must be \"mean\" or \"sum\""
    ))]
    pub aggregation_overrides: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to use pretty console output
    pub pretty: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 16 * 1024 * 1024,
            max_files: 20,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            show_grid: true,
            show_legend: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            pretty: true,
        }
    }
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.chart.width, 1200);
        assert_eq!(config.upload.max_files, 20);
        assert!(config.metrics.aggregation_overrides.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let yaml = serde_yaml::to_string(&config).expect("Failed to serialize to YAML");
        assert!(yaml.contains("server:"));
        assert!(yaml.contains("chart:"));
        assert!(yaml.contains("metrics:"));

        let deserialized: Config =
            serde_yaml::from_str(&yaml).expect("Failed to deserialize from YAML");
        assert_eq!(config.server.port, deserialized.server.port);
        assert_eq!(config.chart.width, deserialized.chart.width);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chart.height, 600);
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.host = String::new();
        assert!(config.validate().is_err());

        config.host = "127.0.0.1".to_string();
        config.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chart_config_validation() {
        let mut config = ChartConfig::default();
        assert!(config.validate().is_ok());

        config.width = 10;
        assert!(config.validate().is_err());

        config.width = 1200;
        config.background_color = "white".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metrics_overrides_validation() {
        let mut config = MetricsConfig::default();
        config
            .aggregation_overrides
            .insert("restingHeartRate".to_string(), "sum".to_string());
        assert!(config.validate().is_ok());

        config
            .aggregation_overrides
            .insert("totalSteps".to_string(), "median".to_string());
        assert!(config.validate().is_err());
    }
}
