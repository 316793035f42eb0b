//! Calendar-period aggregation of daily metric records

use crate::records::MetricRecord;
use crate::registry::AggregationKind;
use crate::series::{MetricSeries, SeriesPoint};
use chrono::{Datelike, Duration, NaiveDate};
use fitgraph_common::FitGraphError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Calendar period a series can be rolled up to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
    Year,
}

impl Period {
    /// First day of the period containing `date`. Weeks start on Monday,
    /// matching the export's own weekly summaries.
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Period::Month => date.with_day(1).expect("day 1 is valid for every month"),
            Period::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)
                .expect("January 1st is valid for every year"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

impl FromStr for Period {
    type Err = FitGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(FitGraphError::validation(format!(
                "Unknown period: {}",
                other
            ))),
        }
    }
}

/// Aggregates daily metric records for one metric
#[derive(Debug, Clone, Copy)]
pub struct MetricAggregator {
    pub period: Period,
    pub kind: AggregationKind,
}

impl MetricAggregator {
    pub fn new(period: Period, kind: AggregationKind) -> Self {
        Self { period, kind }
    }

    /// Collapse records of one metric into a daily series.
    ///
    /// Duplicate entries for the same date resolve last-write-wins in record
    /// order; output is sorted ascending by date.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn collapse_daily(&self, metric: &str, records: &[MetricRecord]) -> MetricSeries {
        let mut by_date: HashMap<NaiveDate, f64> = HashMap::new();

        for record in records {
            if record.metric == metric {
                by_date.insert(record.date, record.value);
            }
        }

        let mut points: Vec<SeriesPoint> = by_date
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect();
        points.sort_by_key(|point| point.date);

        debug!(metric, points = points.len(), "Collapsed daily series");
        MetricSeries::from_points(metric, points)
    }

    /// Roll a daily series up to this aggregator's period.
    ///
    /// Day granularity returns the series unchanged. Coarser periods combine
    /// the contained daily values with the configured aggregation kind; a
    /// period containing zero records is omitted rather than emitted as zero.
    pub fn rollup(&self, series: MetricSeries) -> MetricSeries {
        if self.period == Period::Day {
            return series;
        }

        let mut buckets: HashMap<NaiveDate, (f64, u32)> = HashMap::new();
        for point in &series.points {
            let bucket = self.period.bucket(point.date);
            let entry = buckets.entry(bucket).or_insert((0.0, 0));
            entry.0 += point.value;
            entry.1 += 1;
        }

        let mut points: Vec<SeriesPoint> = buckets
            .into_iter()
            .map(|(date, (total, count))| {
                let value = match self.kind {
                    AggregationKind::Sum => total,
                    AggregationKind::Mean => total / count as f64,
                };
                SeriesPoint { date, value }
            })
            .collect();
        points.sort_by_key(|point| point.date);

        MetricSeries::from_points(series.metric, points)
    }
}
