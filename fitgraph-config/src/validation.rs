//! Validation utilities and regex patterns

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate a log level string
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate the per-metric aggregation override table
pub fn validate_aggregation_overrides(
    overrides: &HashMap<String, String>,
) -> Result<(), ValidationError> {
    for (metric, kind) in overrides {
        if metric.trim().is_empty() {
            return Err(ValidationError::new("empty_metric_name"));
        }
        match kind.as_str() {
            "mean" | "sum" => {}
            _ => return Err(ValidationError::new("invalid_aggregation_kind")),
        }
    }
    Ok(())
}
