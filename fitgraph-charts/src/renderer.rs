//! Chart rendering trait and the plotters line-chart implementation

use crate::types::{ChartSpec, ColorScheme};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use fitgraph_common::{FitGraphError, Result};
use fitgraph_pipeline::MetricSeries;
use image::ImageOutputFormat;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Trait for rendering a named metric series into a displayable chart
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Render a chart to PNG bytes
    async fn render_to_bytes(&self, spec: &ChartSpec, series: &MetricSeries) -> Result<Vec<u8>>;

    /// Render a chart to a file path
    async fn render_to_file(
        &self,
        spec: &ChartSpec,
        series: &MetricSeries,
        path: &Path,
    ) -> Result<()>;

    /// Get colors from a color scheme
    fn colors(&self, scheme: &ColorScheme) -> Vec<RGBColor> {
        match scheme {
            ColorScheme::Default => vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
            ],
            ColorScheme::Dark => vec![
                RGBColor(55, 126, 184),  // Light Blue
                RGBColor(255, 152, 150), // Light Red
                RGBColor(77, 175, 74),   // Light Green
                RGBColor(255, 187, 120), // Light Orange
            ],
            ColorScheme::Custom(colors) => colors
                .iter()
                .map(|color_str| self.parse_color(color_str))
                .collect(),
        }
    }

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }
}

/// Line chart renderer backed by plotters' bitmap backend
#[derive(Debug, Default)]
pub struct LineChartRenderer;

impl LineChartRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the chart onto a prepared drawing area
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        series: &MetricSeries,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let bg_color = self.parse_color(&spec.style.background_color);
        root.fill(&bg_color)?;

        // An empty series renders an empty chart, not an error
        if series.is_empty() {
            let style = (
                spec.style.title_font.family.as_str(),
                spec.style.title_font.size,
            )
                .into_font()
                .color(&RGBColor(96, 96, 96));
            root.draw(&Text::new(
                "No data points",
                (
                    spec.width as i32 / 2 - 60,
                    spec.height as i32 / 2,
                ),
                style,
            ))?;
            return Ok(());
        }

        let (x_min, x_max) = date_range(series);
        let (y_min, y_max) = value_range(series);

        let title_font = (
            spec.style.title_font.family.as_str(),
            spec.style.title_font.size,
        );
        let mut chart = ChartBuilder::on(root)
            .caption(&spec.title, title_font)
            .margin(spec.style.margins.top)
            .x_label_area_size(spec.style.margins.bottom)
            .y_label_area_size(spec.style.margins.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let label_font = (
            spec.style.label_font.family.as_str(),
            spec.style.label_font.size,
        );
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(spec.x_label.as_deref().unwrap_or(""))
            .y_desc(spec.y_label.as_deref().unwrap_or(""))
            .label_style(label_font);
        if !spec.style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        let colors = self.colors(&spec.style.color_scheme);
        let color = colors[0];

        chart
            .draw_series(LineSeries::new(
                series.points.iter().map(|p| (p.date, p.value)),
                &color,
            ))?
            .label(&series.metric)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));

        // Point markers on top of the line
        chart.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new((p.date, p.value), 3, color.filled())),
        )?;

        if spec.style.show_legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(RGBColor(128, 128, 128))
                .draw()?;
        }

        Ok(())
    }
}

#[async_trait]
impl ChartRenderer for LineChartRenderer {
    async fn render_to_bytes(&self, spec: &ChartSpec, series: &MetricSeries) -> Result<Vec<u8>> {
        let (width, height) = (spec.width, spec.height);
        let mut buffer = vec![0u8; (width * height * 3) as usize];

        {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, spec, series)?;
            root.present()?;
        }

        let img = image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| FitGraphError::chart("Rendered buffer has unexpected size"))?;

        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageOutputFormat::Png)
            .map_err(|e| FitGraphError::chart_with_source("Failed to encode PNG", e))?;

        debug!(
            metric = %series.metric,
            bytes = png.get_ref().len(),
            "Rendered chart to PNG"
        );
        Ok(png.into_inner())
    }

    async fn render_to_file(
        &self,
        spec: &ChartSpec,
        series: &MetricSeries,
        path: &Path,
    ) -> Result<()> {
        let root = BitMapBackend::new(path, (spec.width, spec.height)).into_drawing_area();
        self.draw(&root, spec, series)?;
        root.present()?;

        debug!(metric = %series.metric, path = %path.display(), "Rendered chart to file");
        Ok(())
    }
}

/// Date range of the series, padded so single-point series still plot
fn date_range(series: &MetricSeries) -> (NaiveDate, NaiveDate) {
    let (start, end) = series
        .date_range()
        .expect("date_range is only called on non-empty series");
    if start == end {
        (start - Duration::days(1), end + Duration::days(1))
    } else {
        (start, end)
    }
}

/// Value range with 5% padding on each side
fn value_range(series: &MetricSeries) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in &series.points {
        min = min.min(point.value);
        max = max.max(point.value);
    }

    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let padding = (max - min) * 0.05;
    (min - padding, max + padding)
}
