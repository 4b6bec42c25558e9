use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info};

mod metrics;

use timewipe::{Cleaned, InputFormat, Opts, clean_text};

#[derive(Parser, Debug)]
#[command(name = "timewipe-server")]
#[command(about = "HTTP server for removing timestamps from transcripts")]
struct Params {
    /// Host interface to bind to.
    #[arg(long = "host", default_value = "127.0.0.1")]
    host: String,

    /// TCP port to listen on.
    #[arg(long = "port", default_value_t = 8080)]
    port: u16,

    /// Maximum request body size (bytes).
    #[arg(long = "max-bytes", default_value_t = 10 * 1024 * 1024)]
    max_bytes: usize,

    /// Maximum number of texts accepted by a single /v1/bulk request.
    #[arg(long = "max-bulk", default_value_t = 100)]
    max_bulk: usize,
}

#[derive(Clone)]
struct AppState {
    max_bulk: usize,
}

#[derive(Debug, Deserialize)]
struct CleanRequest {
    text: String,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BulkRequest {
    texts: Vec<String>,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Serialize)]
struct CleanResponse {
    success: bool,
    #[serde(flatten)]
    cleaned: Cleaned,
}

#[derive(Debug, Serialize)]
struct BulkResponse {
    success: bool,
    results: Vec<Cleaned>,
    characters_processed: usize,
    timestamps_removed: usize,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            success: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[tokio::main]
async fn main() {
    timewipe::init_logging();

    if let Err(err) = run().await {
        error!(error = ?err, "timewipe-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let params = Params::parse();

    metrics::init();

    let addr: SocketAddr = format!("{}:{}", params.host, params.port)
        .parse()
        .context("invalid host/port bind address")?;

    let state = AppState {
        max_bulk: params.max_bulk,
    };

    let app = router(state)
        .layer(DefaultBodyLimit::max(params.max_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        );

    let listener = TcpListener::bind(addr).await.context("bind failed")?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/v1/clean", post(clean))
        .route("/v1/bulk", post(bulk))
        .route_layer(from_fn(metrics::track_http_metrics))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = ?err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}

async fn root() -> &'static str {
    "timewipe-server: POST /v1/clean {\"text\": ...} | POST /v1/bulk {\"texts\": [...]}"
}

async fn healthz() -> &'static str {
    "ok"
}

async fn clean(
    payload: std::result::Result<Json<CleanRequest>, JsonRejection>,
) -> std::result::Result<Json<CleanResponse>, AppError> {
    let Json(req) = payload?;

    if req.text.trim().is_empty() {
        return Err(AppError::bad_request("text must not be empty"));
    }
    let opts = parse_opts(req.format.as_deref())?;

    let mut cleaned = clean_blocking(vec![req.text], opts).await?;
    let cleaned = cleaned
        .pop()
        .ok_or_else(|| AppError::internal("cleaning produced no result"))?;

    Ok(Json(CleanResponse {
        success: true,
        cleaned,
    }))
}

async fn bulk(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BulkRequest>, JsonRejection>,
) -> std::result::Result<Json<BulkResponse>, AppError> {
    let Json(req) = payload?;

    if req.texts.is_empty() {
        return Err(AppError::bad_request("texts must not be empty"));
    }
    if req.texts.len() > state.max_bulk {
        return Err(AppError::bad_request(format!(
            "too many texts: {} (limit {})",
            req.texts.len(),
            state.max_bulk
        )));
    }
    if let Some(index) = req.texts.iter().position(|text| text.trim().is_empty()) {
        return Err(AppError::bad_request(format!(
            "texts[{index}] must not be empty"
        )));
    }
    let opts = parse_opts(req.format.as_deref())?;

    let results = clean_blocking(req.texts, opts).await?;
    let characters_processed = results.iter().map(|c| c.characters_processed).sum();
    let timestamps_removed = results.iter().map(|c| c.timestamps_removed).sum();

    Ok(Json(BulkResponse {
        success: true,
        results,
        characters_processed,
        timestamps_removed,
    }))
}

/// Clean texts off the async runtime; large bodies are CPU-bound work.
async fn clean_blocking(
    texts: Vec<String>,
    opts: Opts,
) -> std::result::Result<Vec<Cleaned>, AppError> {
    let results = tokio::task::spawn_blocking(move || {
        texts
            .iter()
            .map(|text| clean_text(text, &opts))
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|err| {
        error!(error = ?err, "cleaning task failed");
        AppError::internal("cleaning task failed")
    })?;

    for cleaned in &results {
        metrics::record_cleaned(cleaned);
    }

    Ok(results)
}

fn parse_opts(format: Option<&str>) -> std::result::Result<Opts, AppError> {
    let input_format = format
        .map(str::parse::<InputFormat>)
        .transpose()
        .map_err(|err| AppError::bad_request(err.to_string()))?;

    Ok(Opts {
        input_format,
        ..Opts::default()
    })
}
