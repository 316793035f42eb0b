//! Per-request pipeline orchestration
//!
//! Runs the full parse → collapse → merge → rollup chain over one upload
//! batch. Failures are scoped to individual files: a malformed file is
//! reported and the remaining files still produce charts.

use crate::aggregator::{MetricAggregator, Period};
use crate::parser::parse_upload;
use crate::records::MetricRecord;
use crate::registry::MetricRegistry;
use crate::series::{MetricSeries, SeriesBuilder};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

/// One uploaded file, as received from the upload handler
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Outcome of processing one uploaded file.
///
/// `error` is set when the file could not be parsed at all. A report with
/// zero records and no error means the file was valid but carried nothing
/// usable.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub records: usize,
    pub error: Option<String>,
}

impl FileReport {
    /// Valid input, zero usable records: chart renders empty, no failure
    pub fn is_empty_warning(&self) -> bool {
        self.records == 0 && self.error.is_none()
    }
}

/// Result of one pipeline run: merged, rolled-up series per metric plus
/// per-file reports. Discarded once the response is produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub series: Vec<MetricSeries>,
    pub reports: Vec<FileReport>,
}

impl PipelineOutput {
    /// Series for a single metric, if any records produced one
    pub fn series_for(&self, metric: &str) -> Option<&MetricSeries> {
        self.series.iter().find(|s| s.metric == metric)
    }
}

/// Run the complete pipeline over one upload batch.
///
/// Each file is parsed independently; per-file daily series are merged
/// across files in upload order (later files win on duplicate dates) and the
/// merged series is rolled up to the requested period.
#[instrument(skip(files, registry), fields(files = files.len(), period = period.as_str()))]
pub fn run_pipeline(
    files: &[UploadFile],
    registry: &MetricRegistry,
    period: Period,
) -> PipelineOutput {
    let mut reports = Vec::with_capacity(files.len());
    let mut per_file_records: Vec<Vec<MetricRecord>> = Vec::with_capacity(files.len());

    for file in files {
        match parse_upload(&file.bytes, registry) {
            Ok(records) => {
                reports.push(FileReport {
                    file: file.name.clone(),
                    records: records.len(),
                    error: None,
                });
                per_file_records.push(records);
            }
            Err(e) => {
                warn!(file = %file.name, error = %e, "Failed to process uploaded file");
                reports.push(FileReport {
                    file: file.name.clone(),
                    records: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    // Union of metric names across all parsed files, in stable order
    let mut metric_names: BTreeSet<String> = BTreeSet::new();
    for records in &per_file_records {
        for record in records {
            if !metric_names.contains(&record.metric) {
                metric_names.insert(record.metric.clone());
            }
        }
    }

    let mut series = Vec::with_capacity(metric_names.len());
    for metric in &metric_names {
        let aggregator = MetricAggregator::new(period, registry.kind_for(metric));

        let mut builder = SeriesBuilder::new(metric.clone());
        for records in &per_file_records {
            let fragment = aggregator.collapse_daily(metric, records);
            if !fragment.is_empty() {
                builder.push_fragment(&fragment);
            }
        }

        series.push(aggregator.rollup(builder.build()));
    }

    info!(
        files = files.len(),
        failed = reports.iter().filter(|r| r.error.is_some()).count(),
        metrics = series.len(),
        "Pipeline run complete"
    );

    PipelineOutput { series, reports }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn registry() -> MetricRegistry {
        MetricRegistry::new()
    }

    #[test]
    fn test_single_file_pipeline() {
        let files = vec![UploadFile::new(
            "USDFile_2021.json",
            br#"[{"calendarDate":"2021-01-01","restingHeartRate":55}]"#.to_vec(),
        )];

        let output = run_pipeline(&files, &registry(), Period::Day);

        assert_eq!(output.reports.len(), 1);
        assert!(output.reports[0].error.is_none());

        let series = output.series_for("restingHeartRate").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].date, date(2021, 1, 1));
        assert_eq!(series.points[0].value, 55.0);
    }

    #[test]
    fn test_later_file_wins_on_duplicate_date() {
        let files = vec![
            UploadFile::new(
                "first.json",
                br#"[{"calendarDate":"2021-01-01","restingHeartRate":55}]"#.to_vec(),
            ),
            UploadFile::new(
                "second.json",
                br#"[{"calendarDate":"2021-01-01","restingHeartRate":60}]"#.to_vec(),
            ),
        ];

        let output = run_pipeline(&files, &registry(), Period::Day);
        let series = output.series_for("restingHeartRate").unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].value, 60.0);
    }

    #[test]
    fn test_malformed_file_does_not_abort_batch() {
        let files = vec![
            UploadFile::new("broken.json", b"not json".to_vec()),
            UploadFile::new(
                "good.json",
                br#"[{"calendarDate":"2021-01-01","totalSteps":9000}]"#.to_vec(),
            ),
        ];

        let output = run_pipeline(&files, &registry(), Period::Day);

        assert!(output.reports[0].error.is_some());
        assert!(output.reports[1].error.is_none());

        let series = output.series_for("totalSteps").unwrap();
        assert_eq!(series.points[0].value, 9000.0);
    }

    #[test]
    fn test_empty_upload_array_reports_zero_records() {
        let files = vec![UploadFile::new("empty.json", b"[]".to_vec())];
        let output = run_pipeline(&files, &registry(), Period::Day);

        assert!(output.reports[0].is_empty_warning());
        assert!(output.series.is_empty());
    }

    #[test]
    fn test_multi_year_merge_spans_full_range() {
        let files = vec![
            UploadFile::new(
                "USDFile_2020.json",
                br#"[{"calendarDate":"2020-06-01","restingHeartRate":52}]"#.to_vec(),
            ),
            UploadFile::new(
                "USDFile_2021.json",
                br#"[{"calendarDate":"2021-06-01","restingHeartRate":57}]"#.to_vec(),
            ),
        ];

        let output = run_pipeline(&files, &registry(), Period::Day);
        let series = output.series_for("restingHeartRate").unwrap();

        assert_eq!(
            series.date_range(),
            Some((date(2020, 6, 1), date(2021, 6, 1)))
        );
    }

    #[test]
    fn test_yearly_rollup_through_pipeline() {
        let files = vec![UploadFile::new(
            "steps.json",
            br#"[
                {"calendarDate":"2021-01-01","totalSteps":1000},
                {"calendarDate":"2021-06-01","totalSteps":2000}
            ]"#
            .to_vec(),
        )];

        let output = run_pipeline(&files, &registry(), Period::Year);
        let series = output.series_for("totalSteps").unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].date, date(2021, 1, 1));
        assert_eq!(series.points[0].value, 3000.0);
    }

    #[test]
    fn test_derived_metric_series_present() {
        let files = vec![UploadFile::new(
            "distance.json",
            br#"[{"calendarDate":"2021-01-01","totalDistanceMeters":2000}]"#.to_vec(),
        )];

        let output = run_pipeline(&files, &registry(), Period::Day);
        let km = output.series_for("totalDistanceKilometers").unwrap();
        assert!((km.points[0].value - 2.0).abs() < f64::EPSILON);
    }
}
