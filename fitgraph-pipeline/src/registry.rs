//! Fixed table of recognized metrics and their aggregation kinds
//!
//! The registry is built once at startup and never mutated afterwards. It
//! carries the base metrics read from export entries plus derived
//! unit-converted metrics (meters to kilometers, seconds/minutes to hours).

use fitgraph_common::{humanize_metric_name, FitGraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version of the recognized-metric table
pub const REGISTRY_VERSION: u32 = 1;

/// The statistical function used to combine daily values into a coarser
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    /// Arithmetic mean, for instantaneous measurements like heart rate
    Mean,
    /// Sum, for cumulative duration/count metrics
    Sum,
}

impl AggregationKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "mean" => Ok(Self::Mean),
            "sum" => Ok(Self::Sum),
            other => Err(FitGraphError::validation(format!(
                "Unknown aggregation kind: {}",
                other
            ))),
        }
    }
}

/// One recognized metric: export field name, display label, aggregation kind
#[derive(Debug, Clone)]
pub struct MetricDefinition {
    pub field: String,
    pub label: String,
    pub kind: AggregationKind,
    /// Scale factor applied to the base field value (1.0 for base metrics)
    pub scale: f64,
    /// Base export field this metric is read from
    pub source_field: String,
}

/// Unit conversions applied to base metrics with a recognizable suffix.
/// Each produces an additional derived metric alongside the base one.
const UNIT_CONVERSIONS: &[(&str, &str, f64)] = &[
    ("Meters", "Kilometers", 1.0 / 1000.0),
    ("Seconds", "Hours", 1.0 / 3600.0),
    ("Minutes", "Hours", 1.0 / 60.0),
    ("Milliseconds", "Hours", 1.0 / 3_600_000.0),
];

/// Base metric table, v1. Heart-rate metrics are instantaneous measurements
/// and average across a period; step/distance/calorie/duration metrics are
/// cumulative and sum.
const BASE_METRICS: &[(&str, AggregationKind)] = &[
    ("restingHeartRate", AggregationKind::Mean),
    ("minHeartRate", AggregationKind::Mean),
    ("maxHeartRate", AggregationKind::Mean),
    ("currentDayRestingHeartRate", AggregationKind::Mean),
    ("totalSteps", AggregationKind::Sum),
    ("totalDistanceMeters", AggregationKind::Sum),
    ("totalKilocalories", AggregationKind::Sum),
    ("activeKilocalories", AggregationKind::Sum),
    ("highlyActiveSeconds", AggregationKind::Sum),
    ("activeSeconds", AggregationKind::Sum),
    ("sedentarySeconds", AggregationKind::Sum),
    ("sleepingSeconds", AggregationKind::Sum),
    ("moderateIntensityMinutes", AggregationKind::Sum),
    ("vigorousIntensityMinutes", AggregationKind::Sum),
    ("floorsAscended", AggregationKind::Sum),
];

/// Immutable lookup table of recognized metrics, loaded once at startup
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    metrics: HashMap<String, MetricDefinition>,
}

impl MetricRegistry {
    /// Build the registry from the built-in table
    pub fn new() -> Self {
        Self::build(&HashMap::new()).expect("built-in metric table is valid")
    }

    /// Build the registry with per-metric aggregation overrides from
    /// configuration (`{metric_name: "mean"|"sum"}`). Overrides may target
    /// base or derived metric names; unknown names are rejected.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Result<Self> {
        Self::build(overrides)
    }

    fn build(overrides: &HashMap<String, String>) -> Result<Self> {
        let mut metrics = HashMap::new();

        for (field, kind) in BASE_METRICS {
            let def = MetricDefinition {
                field: (*field).to_string(),
                label: humanize_metric_name(field),
                kind: *kind,
                scale: 1.0,
                source_field: (*field).to_string(),
            };
            metrics.insert(def.field.clone(), def);

            // Derived unit metrics inherit the base aggregation kind
            if let Some((derived_field, scale)) = derive_metric_name(field) {
                let def = MetricDefinition {
                    label: humanize_metric_name(&derived_field),
                    field: derived_field.clone(),
                    kind: *kind,
                    scale,
                    source_field: (*field).to_string(),
                };
                metrics.insert(derived_field, def);
            }
        }

        for (metric, kind) in overrides {
            let kind = AggregationKind::parse(kind)?;
            match metrics.get_mut(metric) {
                Some(def) => def.kind = kind,
                None => {
                    return Err(FitGraphError::validation(format!(
                        "Aggregation override for unrecognized metric: {}",
                        metric
                    )))
                }
            }
        }

        Ok(Self { metrics })
    }

    /// Look up a metric definition by name
    pub fn get(&self, metric: &str) -> Option<&MetricDefinition> {
        self.metrics.get(metric)
    }

    /// Aggregation kind for a metric, defaulting to mean for unknown names
    pub fn kind_for(&self, metric: &str) -> AggregationKind {
        self.metrics
            .get(metric)
            .map(|def| def.kind)
            .unwrap_or(AggregationKind::Mean)
    }

    /// Display label for a metric name
    pub fn label_for(&self, metric: &str) -> String {
        self.metrics
            .get(metric)
            .map(|def| def.label.clone())
            .unwrap_or_else(|| humanize_metric_name(metric))
    }

    /// Derived metrics read from the given base export field
    pub fn derived_from(&self, source_field: &str) -> Vec<&MetricDefinition> {
        let mut derived: Vec<&MetricDefinition> = self
            .metrics
            .values()
            .filter(|def| def.source_field == source_field && def.field != source_field)
            .collect();
        derived.sort_by(|a, b| a.field.cmp(&b.field));
        derived
    }

    /// All recognized metric names, sorted
    pub fn metric_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.metrics.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Derived metric name for a base field with a convertible unit suffix
fn derive_metric_name(field: &str) -> Option<(String, f64)> {
    for (suffix, replacement, scale) in UNIT_CONVERSIONS {
        if let Some(stem) = field.strip_suffix(suffix) {
            if !stem.is_empty() {
                return Some((format!("{}{}", stem, replacement), *scale));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = MetricRegistry::new();

        assert_eq!(
            registry.kind_for("restingHeartRate"),
            AggregationKind::Mean
        );
        assert_eq!(registry.kind_for("totalSteps"), AggregationKind::Sum);
        assert_eq!(registry.label_for("restingHeartRate"), "Resting heart rate");
    }

    #[test]
    fn test_derived_metrics_registered() {
        let registry = MetricRegistry::new();

        let km = registry.get("totalDistanceKilometers").unwrap();
        assert_eq!(km.source_field, "totalDistanceMeters");
        assert_eq!(km.kind, AggregationKind::Sum);
        assert!((km.scale - 0.001).abs() < f64::EPSILON);

        let hours = registry.get("sleepingHours").unwrap();
        assert_eq!(hours.source_field, "sleepingSeconds");
        assert!((hours.scale - 1.0 / 3600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_derive_metric_name() {
        assert_eq!(
            derive_metric_name("totalDistanceMeters"),
            Some(("totalDistanceKilometers".to_string(), 0.001))
        );
        assert_eq!(
            derive_metric_name("moderateIntensityMinutes").map(|(n, _)| n),
            Some("moderateIntensityHours".to_string())
        );
        assert_eq!(derive_metric_name("restingHeartRate"), None);
        assert_eq!(derive_metric_name("Meters"), None);
    }

    #[test]
    fn test_overrides_applied() {
        let mut overrides = HashMap::new();
        overrides.insert("restingHeartRate".to_string(), "sum".to_string());

        let registry = MetricRegistry::with_overrides(&overrides).unwrap();
        assert_eq!(registry.kind_for("restingHeartRate"), AggregationKind::Sum);
        // Other metrics untouched
        assert_eq!(registry.kind_for("minHeartRate"), AggregationKind::Mean);
    }

    #[test]
    fn test_override_rejects_unknown_metric() {
        let mut overrides = HashMap::new();
        overrides.insert("stepCadence".to_string(), "sum".to_string());
        assert!(MetricRegistry::with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_override_rejects_unknown_kind() {
        let mut overrides = HashMap::new();
        overrides.insert("totalSteps".to_string(), "median".to_string());
        assert!(MetricRegistry::with_overrides(&overrides).is_err());
    }

    #[test]
    fn test_derived_from() {
        let registry = MetricRegistry::new();
        let derived = registry.derived_from("totalDistanceMeters");
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].field, "totalDistanceKilometers");

        assert!(registry.derived_from("restingHeartRate").is_empty());
    }
}
