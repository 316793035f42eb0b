//! Chart specification types

use fitgraph_common::humanize_metric_name;
use fitgraph_pipeline::{AggregationKind, Period};
use serde::{Deserialize, Serialize};

/// Color scheme for charts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ColorScheme {
    Default,
    Dark,
    Custom(Vec<String>),
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 12,
        }
    }
}

/// Margin configuration in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20,
            right: 20,
            bottom: 40,
            left: 60,
        }
    }
}

/// Styling configuration shared by all chart types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartStyle {
    pub color_scheme: ColorScheme,
    pub background_color: String,
    pub title_font: FontSpec,
    pub label_font: FontSpec,
    pub margins: Margins,
    pub show_grid: bool,
    pub show_legend: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Default,
            background_color: "#FFFFFF".to_string(),
            title_font: FontSpec {
                family: "sans-serif".to_string(),
                size: 20,
            },
            label_font: FontSpec::default(),
            margins: Margins::default(),
            show_grid: true,
            show_legend: true,
        }
    }
}

/// Renderable description of one chart: labels, dimensions and style.
///
/// Has no lifecycle beyond the response it is rendered for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub style: ChartStyle,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: None,
            y_label: None,
            width: 1200,
            height: 600,
            style: ChartStyle::default(),
        }
    }
}

impl ChartSpec {
    /// Build a chart spec for one metric series with human-readable labels
    /// derived from the metric name, e.g. "Mean of Resting heart rate by
    /// week".
    pub fn for_metric(
        metric: &str,
        label: Option<&str>,
        period: Period,
        kind: AggregationKind,
    ) -> Self {
        let metric_label = label
            .map(str::to_string)
            .unwrap_or_else(|| humanize_metric_name(metric));
        let kind_label = match kind {
            AggregationKind::Mean => "Mean",
            AggregationKind::Sum => "Sum",
        };

        Self {
            title: format!("{} of {} by {}", kind_label, metric_label, period.as_str()),
            x_label: Some(humanize_metric_name(period.as_str())),
            y_label: Some(metric_label),
            ..Default::default()
        }
    }

    /// Override chart dimensions
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Override the background color
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.style.background_color = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_labels_from_metric_name() {
        let spec = ChartSpec::for_metric(
            "restingHeartRate",
            None,
            Period::Week,
            AggregationKind::Mean,
        );

        assert_eq!(spec.title, "Mean of Resting heart rate by week");
        assert_eq!(spec.x_label.as_deref(), Some("Week"));
        assert_eq!(spec.y_label.as_deref(), Some("Resting heart rate"));
    }

    #[test]
    fn test_spec_uses_registry_label_when_given() {
        let spec = ChartSpec::for_metric(
            "totalSteps",
            Some("Total steps"),
            Period::Day,
            AggregationKind::Sum,
        );
        assert_eq!(spec.title, "Sum of Total steps by day");
    }

    #[test]
    fn test_builder_overrides() {
        let spec = ChartSpec::default()
            .with_dimensions(640, 480)
            .with_background_color("#2b2b2b");
        assert_eq!(spec.width, 640);
        assert_eq!(spec.height, 480);
        assert_eq!(spec.style.background_color, "#2b2b2b");
    }
}
