//! Typed daily-aggregate records parsed from Garmin export files

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// One daily metric measurement extracted from an export entry.
///
/// Immutable once created; `value` is already unit-converted for derived
/// metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub date: NaiveDate,
    pub metric: String,
    pub value: f64,
}

impl MetricRecord {
    pub fn new(date: NaiveDate, metric: impl Into<String>, value: f64) -> Self {
        Self {
            date,
            metric: metric.into(),
            value,
        }
    }
}

/// One JSON object from the export representing a single calendar day's
/// summarized metrics.
///
/// All metric fields are optional; unknown JSON keys are ignored. This is the
/// explicit typed schema replacing ad-hoc dynamic key access: only fields
/// listed here (the registry's base metrics) are ever read from an upload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyAggregateEntry {
    /// Some exports abbreviate the date key to plain `date`
    #[serde(alias = "date", deserialize_with = "deserialize_calendar_date")]
    pub calendar_date: Option<NaiveDate>,

    pub resting_heart_rate: Option<f64>,
    pub min_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub current_day_resting_heart_rate: Option<f64>,
    pub total_steps: Option<f64>,
    pub total_distance_meters: Option<f64>,
    pub total_kilocalories: Option<f64>,
    pub active_kilocalories: Option<f64>,
    pub highly_active_seconds: Option<f64>,
    pub active_seconds: Option<f64>,
    pub sedentary_seconds: Option<f64>,
    pub sleeping_seconds: Option<f64>,
    pub moderate_intensity_minutes: Option<f64>,
    pub vigorous_intensity_minutes: Option<f64>,
    pub floors_ascended: Option<f64>,
}

impl DailyAggregateEntry {
    /// Metric field values present on this entry, keyed by export field name.
    pub fn metric_values(&self) -> Vec<(&'static str, f64)> {
        let fields = [
            ("restingHeartRate", self.resting_heart_rate),
            ("minHeartRate", self.min_heart_rate),
            ("maxHeartRate", self.max_heart_rate),
            (
                "currentDayRestingHeartRate",
                self.current_day_resting_heart_rate,
            ),
            ("totalSteps", self.total_steps),
            ("totalDistanceMeters", self.total_distance_meters),
            ("totalKilocalories", self.total_kilocalories),
            ("activeKilocalories", self.active_kilocalories),
            ("highlyActiveSeconds", self.highly_active_seconds),
            ("activeSeconds", self.active_seconds),
            ("sedentarySeconds", self.sedentary_seconds),
            ("sleepingSeconds", self.sleeping_seconds),
            ("moderateIntensityMinutes", self.moderate_intensity_minutes),
            ("vigorousIntensityMinutes", self.vigorous_intensity_minutes),
            ("floorsAscended", self.floors_ascended),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }

    /// Whether this entry carries a usable date and at least one known metric
    pub fn is_usable(&self) -> bool {
        self.calendar_date.is_some() && !self.metric_values().is_empty()
    }
}

/// Accepts both the plain `YYYY-MM-DD` form and the full timestamp form
/// (`2021-01-01T00:00:00.0`) found in real exports.
fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_calendar_date))
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
