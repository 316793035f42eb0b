//! HTTP application: routes, handlers and response types
//!
//! One POST carries the whole interaction: export files go in as multipart
//! form data, rendered charts come back as base64 PNGs together with a
//! per-file report. Nothing is stored between requests.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use fitgraph_charts::{ChartRenderer, ChartSpec, LineChartRenderer};
use fitgraph_common::FitGraphError;
use fitgraph_config::{Config, UploadConfig};
use fitgraph_pipeline::{run_pipeline, FileReport, MetricRegistry, Period, UploadFile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

/// Shared application state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Metric registry with deployment overrides applied
    pub registry: Arc<MetricRegistry>,
    /// Chart renderer
    pub renderer: Arc<LineChartRenderer>,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self, FitGraphError> {
        let registry = MetricRegistry::with_overrides(&config.metrics.aggregation_overrides)?;
        Ok(Self {
            config,
            registry: Arc::new(registry),
            renderer: Arc::new(LineChartRenderer::new()),
        })
    }
}

/// Query parameters for the chart endpoint
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Restrict the response to a single metric
    pub metric: Option<String>,
    /// Calendar period to roll daily values up to
    #[serde(default)]
    pub period: Period,
}

/// One rendered chart in the response
#[derive(Debug, Serialize)]
pub struct ChartImage {
    pub metric: String,
    pub label: String,
    pub points: usize,
    pub image_base64: String,
}

/// Response body for the chart endpoint
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub period: String,
    pub charts: Vec<ChartImage>,
    pub reports: Vec<FileReport>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub metrics: usize,
}

/// Error type returned by the HTTP handlers.
///
/// Upload-side errors (bad JSON, unrecognized schema, invalid parameters)
/// map to 400; everything else is a 500.
#[derive(Debug)]
pub struct ApiError(FitGraphError);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self(FitGraphError::validation(message))
    }
}

impl From<FitGraphError> for ApiError {
    fn from(e: FitGraphError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_upload_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Create the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let upload = &state.config.upload;
    // Multipart framing overhead on top of the raw file budget
    let body_limit = upload.max_file_bytes * upload.max_files + 1024 * 1024;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/charts", post(generate_charts))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

/// Serve the upload page
async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Health and readiness check
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.registry.len(),
    })
}

/// Process an upload batch and return rendered charts.
///
/// Files that fail to parse or exceed the upload limits are reported
/// individually; the remaining files still produce charts.
#[instrument(skip(state, multipart), fields(period = query.period.as_str()))]
async fn generate_charts(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
    multipart: Multipart,
) -> Result<Json<ChartsResponse>, ApiError> {
    let (files, mut reports) = collect_files(multipart, &state.config.upload).await?;

    if files.is_empty() && reports.is_empty() {
        return Err(ApiError::bad_request("Upload contains no files"));
    }

    let output = run_pipeline(&files, &state.registry, query.period);

    let mut charts = Vec::new();
    for series in &output.series {
        if let Some(metric) = &query.metric {
            if &series.metric != metric {
                continue;
            }
        }

        let spec = chart_spec_for(&state.config, &state.registry, &series.metric, query.period);
        let png = state.renderer.render_to_bytes(&spec, series).await?;

        charts.push(ChartImage {
            metric: series.metric.clone(),
            label: state.registry.label_for(&series.metric),
            points: series.len(),
            image_base64: BASE64.encode(&png),
        });
    }

    let mut all_reports = output.reports;
    all_reports.append(&mut reports);

    info!(
        charts = charts.len(),
        files = all_reports.len(),
        "Upload processed"
    );

    Ok(Json(ChartsResponse {
        period: query.period.as_str().to_string(),
        charts,
        reports: all_reports,
    }))
}

/// Read multipart fields into upload files, enforcing per-file limits.
///
/// A file over the size limit, or past the file-count limit, is rejected
/// with its own report instead of failing the whole request.
async fn collect_files(
    mut multipart: Multipart,
    limits: &UploadConfig,
) -> Result<(Vec<UploadFile>, Vec<FileReport>), ApiError> {
    let mut files = Vec::new();
    let mut rejected = Vec::new();
    let mut index = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file {name}: {e}")))?;

        match reject_reason(index, bytes.len(), limits) {
            Some(reason) => {
                warn!(file = %name, reason = %reason, "Rejected uploaded file");
                rejected.push(FileReport {
                    file: name,
                    records: 0,
                    error: Some(reason),
                });
            }
            None => files.push(UploadFile::new(name, bytes.to_vec())),
        }
        index += 1;
    }

    Ok((files, rejected))
}

/// Why the file at `index` with `size` bytes must be rejected, if at all
fn reject_reason(index: usize, size: usize, limits: &UploadConfig) -> Option<String> {
    if index >= limits.max_files {
        Some(format!(
            "Upload is limited to {} files per request",
            limits.max_files
        ))
    } else if size > limits.max_file_bytes {
        Some(format!(
            "File exceeds the {} byte size limit",
            limits.max_file_bytes
        ))
    } else {
        None
    }
}

/// Chart spec for one metric, styled from the application configuration
fn chart_spec_for(
    config: &Config,
    registry: &MetricRegistry,
    metric: &str,
    period: Period,
) -> ChartSpec {
    let label = registry.label_for(metric);
    let mut spec = ChartSpec::for_metric(metric, Some(&label), period, registry.kind_for(metric))
        .with_dimensions(config.chart.width, config.chart.height)
        .with_background_color(config.chart.background_color.clone());

    spec.style.label_font.family = config.chart.font_family.clone();
    spec.style.label_font.size = config.chart.font_size;
    spec.style.show_grid = config.chart.show_grid;
    spec.style.show_legend = config.chart.show_legend;
    spec
}
