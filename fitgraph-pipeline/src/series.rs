//! Metric series and the cross-file time-series builder

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One (date, value) pair of a metric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ordered sequence of (date, value) pairs for a single metric.
///
/// Sorted ascending by date with no duplicate dates. Owned transiently for
/// the duration of one render request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub metric: String,
    pub points: Vec<SeriesPoint>,
}

impl MetricSeries {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            points: Vec::new(),
        }
    }

    pub fn from_points(metric: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            metric: metric.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// First and last date covered by the series
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}

/// Merges per-file series fragments into one continuous series per metric.
///
/// Fragments are pushed in upload order; on a date conflict the
/// later-pushed fragment wins. The built series is sorted ascending.
#[derive(Debug, Default)]
pub struct SeriesBuilder {
    metric: String,
    merged: BTreeMap<NaiveDate, f64>,
}

impl SeriesBuilder {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            merged: BTreeMap::new(),
        }
    }

    /// Merge one fragment; values overwrite earlier fragments on equal dates
    pub fn push_fragment(&mut self, fragment: &MetricSeries) -> &mut Self {
        for point in &fragment.points {
            self.merged.insert(point.date, point.value);
        }
        self
    }

    /// Build the merged series. An empty input produces an empty series.
    pub fn build(self) -> MetricSeries {
        let points = self
            .merged
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect();
        MetricSeries {
            metric: self.metric,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fragment(metric: &str, points: &[(NaiveDate, f64)]) -> MetricSeries {
        MetricSeries::from_points(
            metric,
            points
                .iter()
                .map(|&(date, value)| SeriesPoint { date, value })
                .collect(),
        )
    }

    #[test]
    fn test_later_fragment_wins() {
        let a = fragment("restingHeartRate", &[(date(2021, 1, 1), 55.0)]);
        let b = fragment("restingHeartRate", &[(date(2021, 1, 1), 60.0)]);

        let mut builder = SeriesBuilder::new("restingHeartRate");
        builder.push_fragment(&a);
        builder.push_fragment(&b);
        let merged = builder.build();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.points[0].value, 60.0);
    }

    #[test]
    fn test_merge_unions_dates_sorted() {
        let y2021 = fragment(
            "totalSteps",
            &[(date(2021, 6, 1), 9000.0), (date(2021, 6, 2), 7000.0)],
        );
        let y2020 = fragment("totalSteps", &[(date(2020, 6, 1), 5000.0)]);

        let mut builder = SeriesBuilder::new("totalSteps");
        builder.push_fragment(&y2021);
        builder.push_fragment(&y2020);
        let merged = builder.build();

        let dates: Vec<NaiveDate> = merged.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date(2020, 6, 1), date(2021, 6, 1), date(2021, 6, 2)]
        );
    }

    #[test]
    fn test_merge_is_associative_in_date_coverage() {
        let a = fragment("m", &[(date(2021, 1, 1), 1.0)]);
        let b = fragment("m", &[(date(2021, 1, 2), 2.0)]);
        let c = fragment("m", &[(date(2021, 1, 3), 3.0)]);

        // A then B then C
        let mut sequential = SeriesBuilder::new("m");
        sequential.push_fragment(&a).push_fragment(&b).push_fragment(&c);
        let sequential = sequential.build();

        // (A+B) then C
        let mut ab = SeriesBuilder::new("m");
        ab.push_fragment(&a).push_fragment(&b);
        let ab = ab.build();
        let mut grouped = SeriesBuilder::new("m");
        grouped.push_fragment(&ab).push_fragment(&c);
        let grouped = grouped.build();

        assert_eq!(sequential, grouped);
    }

    #[test]
    fn test_non_overlapping_fragments_round_trip() {
        let a = fragment(
            "m",
            &[(date(2020, 1, 1), 1.5), (date(2020, 1, 2), 2.5)],
        );
        let b = fragment("m", &[(date(2021, 1, 1), 3.5)]);

        let mut builder = SeriesBuilder::new("m");
        builder.push_fragment(&a).push_fragment(&b);
        let merged = builder.build();

        for original in a.points.iter().chain(b.points.iter()) {
            assert!(merged.points.contains(original));
        }
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_empty_input_produces_empty_series() {
        let merged = SeriesBuilder::new("m").build();
        assert!(merged.is_empty());
        assert!(merged.date_range().is_none());
    }

    #[test]
    fn test_date_range() {
        let series = fragment(
            "m",
            &[(date(2020, 1, 1), 1.0), (date(2021, 12, 31), 2.0)],
        );
        assert_eq!(
            series.date_range(),
            Some((date(2020, 1, 1), date(2021, 12, 31)))
        );
    }
}
