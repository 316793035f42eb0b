//! Upload-to-series pipeline for the fitgraph export visualiser
//!
//! The pipeline is a pure, single-pass transformation run once per upload
//! request: parse export files into daily metric records, collapse them into
//! per-file daily series, merge the series across files and roll them up to
//! the requested calendar period. Nothing is retained after the request.

pub mod aggregator;
pub mod parser;
pub mod pipeline;
pub mod records;
pub mod registry;
pub mod series;

pub use aggregator::{MetricAggregator, Period};
pub use parser::parse_upload;
pub use pipeline::{run_pipeline, FileReport, PipelineOutput, UploadFile};
pub use records::{DailyAggregateEntry, MetricRecord};
pub use registry::{AggregationKind, MetricDefinition, MetricRegistry, REGISTRY_VERSION};
pub use series::{MetricSeries, SeriesBuilder, SeriesPoint};
