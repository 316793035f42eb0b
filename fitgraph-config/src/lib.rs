//! Configuration management for the fitgraph export visualiser

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{ChartConfig, Config, LoggingConfig, MetricsConfig, ServerConfig, UploadConfig};
