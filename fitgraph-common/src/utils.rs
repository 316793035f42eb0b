//! Utility functions used across the fitgraph application

use crate::Result;
use chrono::NaiveDate;

/// Convert a camelCase metric field name to a human-readable label.
///
/// `restingHeartRate` becomes "Resting heart rate".
pub fn humanize_metric_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() && index != 0 {
            result.push(' ');
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    // Capitalize the first character
    let mut chars = result.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => result,
    }
}

/// Format a calendar date for display
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Validate that a string is not empty after trimming
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(crate::FitGraphError::validation_for_field(
            format!("{} cannot be empty", field_name),
            field_name,
        ))
    } else {
        Ok(trimmed.to_string())
    }
}
