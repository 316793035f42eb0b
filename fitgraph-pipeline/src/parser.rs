//! Record parser for uploaded export files
//!
//! Converts the raw bytes of one uploaded file into daily metric records.
//! Parsing is tolerant: individual malformed entries are skipped, and only a
//! file that yields nothing usable at all is reported as an error.

use crate::records::{DailyAggregateEntry, MetricRecord};
use crate::registry::{AggregationKind, MetricRegistry};
use fitgraph_common::{FitGraphError, Result};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Parse one uploaded export file into daily metric records.
///
/// Fails with a parse error when the content is not valid JSON and with a
/// schema error when no daily-aggregate entries can be located or none of
/// them carries a known metric field. Entries that fail to decode
/// individually are skipped.
#[instrument(skip(bytes, registry), fields(len = bytes.len()))]
pub fn parse_upload(bytes: &[u8], registry: &MetricRegistry) -> Result<Vec<MetricRecord>> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| FitGraphError::parse_with_source("Uploaded content is not valid JSON", e))?;

    let entries = locate_entries(&value)?;
    let total = entries.len();

    let mut records = Vec::new();
    let mut recognized = 0usize;

    for entry in entries {
        let entry: DailyAggregateEntry = match serde_json::from_value(entry.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping undecodable entry: {}", e);
                continue;
            }
        };

        if !entry.is_usable() {
            continue;
        }
        let Some(date) = entry.calendar_date else {
            continue;
        };
        recognized += 1;
        for (field, value) in entry.metric_values() {
            // Duration/count metrics must be non-negative
            if registry.kind_for(field) == AggregationKind::Sum && value < 0.0 {
                warn!(metric = field, value, "Dropping negative cumulative value");
                continue;
            }

            records.push(MetricRecord::new(date, field, value));

            for derived in registry.derived_from(field) {
                records.push(MetricRecord::new(
                    date,
                    derived.field.clone(),
                    value * derived.scale,
                ));
            }
        }
    }

    // An empty entry array is a valid (if useless) upload; a non-empty one
    // where nothing was recognized means the schema is wrong.
    if recognized == 0 && total > 0 {
        return Err(FitGraphError::schema(
            "No entries with a known metric field found in upload",
        ));
    }

    debug!(
        entries = total,
        recognized,
        records = records.len(),
        "Parsed upload"
    );
    Ok(records)
}

/// Locate the array of daily-aggregate entries: either the top-level value
/// itself or the first array found among the values of a top-level object.
fn locate_entries(value: &Value) -> Result<&Vec<Value>> {
    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(map) => map
            .values()
            .find_map(|v| v.as_array())
            .ok_or_else(|| FitGraphError::schema("No entry array found in uploaded object")),
        _ => Err(FitGraphError::schema(
            "Expected an array of daily-aggregate entries",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn registry() -> MetricRegistry {
        MetricRegistry::new()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_entry() {
        let input = br#"[{"calendarDate":"2021-01-01","restingHeartRate":55}]"#;
        let records = parse_upload(input, &registry()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date(2021, 1, 1));
        assert_eq!(records[0].metric, "restingHeartRate");
        assert_eq!(records[0].value, 55.0);
    }

    #[test]
    fn test_record_count_matches_recognized_fields() {
        let input = br#"[
            {"calendarDate":"2021-01-01","restingHeartRate":55,"totalSteps":9000},
            {"calendarDate":"2021-01-02","restingHeartRate":57}
        ]"#;
        let records = parse_upload(input, &registry()).unwrap();
        // One record per known metric field present
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_not_json_is_parse_error() {
        let result = parse_upload(b"not json", &registry());
        assert!(matches!(result, Err(FitGraphError::Parse { .. })));
    }

    #[test]
    fn test_wrong_structure_is_schema_error() {
        let result = parse_upload(br#""just a string""#, &registry());
        assert!(matches!(result, Err(FitGraphError::Schema { .. })));

        let result = parse_upload(br#"{"version":2}"#, &registry());
        assert!(matches!(result, Err(FitGraphError::Schema { .. })));
    }

    #[test]
    fn test_no_known_fields_is_schema_error() {
        let input = br#"[{"calendarDate":"2021-01-01","unknownField":1}]"#;
        let result = parse_upload(input, &registry());
        assert!(matches!(result, Err(FitGraphError::Schema { .. })));
    }

    #[test]
    fn test_partially_malformed_file_parses_what_it_can() {
        let input = br#"[
            {"calendarDate":"2021-01-01","restingHeartRate":55},
            {"calendarDate":"not a date","restingHeartRate":60},
            {"somethingElse":true}
        ]"#;
        let records = parse_upload(input, &registry()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 55.0);
    }

    #[test]
    fn test_entries_nested_in_object() {
        let input = br#"{"payload":[{"calendarDate":"2021-01-01","totalSteps":100}]}"#;
        let records = parse_upload(input, &registry()).unwrap();
        assert_eq!(records[0].metric, "totalSteps");
    }

    #[test]
    fn test_derived_unit_records() {
        let input = br#"[{"calendarDate":"2021-01-01","totalDistanceMeters":2000}]"#;
        let records = parse_upload(input, &registry()).unwrap();

        assert_eq!(records.len(), 2);
        let km = records
            .iter()
            .find(|r| r.metric == "totalDistanceKilometers")
            .unwrap();
        assert!((km.value - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_cumulative_value_dropped() {
        let input = br#"[{"calendarDate":"2021-01-01","totalSteps":-5,"restingHeartRate":55}]"#;
        let records = parse_upload(input, &registry()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metric, "restingHeartRate");
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        let records = parse_upload(b"[]", &registry()).unwrap();
        assert!(records.is_empty());
    }
}
