//! Common utilities and types for the fitgraph export visualiser

pub mod error;
pub mod logging;
pub mod utils;

// Re-export commonly used types
pub use error::{FitGraphError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use utils::{format_date, humanize_metric_name, validate_non_empty};
