use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts as PromOpts,
    Registry, TextEncoder,
};

use timewipe::Cleaned;

struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_in_flight_requests: IntGauge,
    transcripts_cleaned_total: IntCounter,
    characters_processed_total: IntCounter,
    timestamps_removed_total: IntCounter,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

fn metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            PromOpts::new(
                "timewipe_http_requests_total",
                "Total HTTP requests served by timewipe-server.",
            ),
            &["route", "status"],
        )
        .expect("metrics definition must be valid");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "timewipe_http_request_duration_seconds",
                "HTTP request latency in seconds.",
            ),
            &["route", "status"],
        )
        .expect("metrics definition must be valid");

        let http_in_flight_requests = IntGauge::new(
            "timewipe_http_in_flight_requests",
            "Current number of in-flight HTTP requests.",
        )
        .expect("metrics definition must be valid");

        let transcripts_cleaned_total = IntCounter::new(
            "timewipe_transcripts_cleaned_total",
            "Transcripts cleaned across /v1/clean and /v1/bulk.",
        )
        .expect("metrics definition must be valid");

        let characters_processed_total = IntCounter::new(
            "timewipe_characters_processed_total",
            "Input characters processed.",
        )
        .expect("metrics definition must be valid");

        let timestamps_removed_total = IntCounter::new(
            "timewipe_timestamps_removed_total",
            "Timestamps removed from transcripts.",
        )
        .expect("metrics definition must be valid");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metrics must register");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metrics must register");
        registry
            .register(Box::new(http_in_flight_requests.clone()))
            .expect("metrics must register");
        registry
            .register(Box::new(transcripts_cleaned_total.clone()))
            .expect("metrics must register");
        registry
            .register(Box::new(characters_processed_total.clone()))
            .expect("metrics must register");
        registry
            .register(Box::new(timestamps_removed_total.clone()))
            .expect("metrics must register");

        Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_in_flight_requests,
            transcripts_cleaned_total,
            characters_processed_total,
            timestamps_removed_total,
        }
    })
}

pub fn init() {
    let _ = metrics();
}

/// Account for one cleaned transcript.
pub fn record_cleaned(cleaned: &Cleaned) {
    let m = metrics();
    m.transcripts_cleaned_total.inc();
    m.characters_processed_total
        .inc_by(cleaned.characters_processed as u64);
    m.timestamps_removed_total
        .inc_by(cleaned.timestamps_removed as u64);
}

pub async fn prometheus_metrics() -> Response {
    let families = metrics().registry.gather();
    let mut buf = Vec::new();
    if TextEncoder::new().encode(&families, &mut buf).is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to encode metrics",
        )
            .into_response();
    }

    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
        )],
        buf,
    )
        .into_response()
}

pub async fn track_http_metrics(req: Request<Body>, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str())
        .unwrap_or_else(|| req.uri().path())
        .to_owned();

    if route == "/metrics" || route == "/healthz" {
        return next.run(req).await;
    }

    let start = Instant::now();

    metrics().http_in_flight_requests.inc();
    let response = next.run(req).await;
    metrics().http_in_flight_requests.dec();

    let status = response.status().as_u16().to_string();
    metrics()
        .http_requests_total
        .with_label_values(&[&route, &status])
        .inc();
    metrics()
        .http_request_duration_seconds
        .with_label_values(&[&route, &status])
        .observe(start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_cleaned_accumulates_counters() {
        let before = metrics().timestamps_removed_total.get();
        record_cleaned(&Cleaned {
            text: "Hello World".to_owned(),
            characters_processed: 27,
            timestamps_removed: 2,
        });
        assert!(metrics().timestamps_removed_total.get() >= before + 2);
    }

    #[tokio::test]
    async fn prometheus_metrics_renders_text_format() {
        init();
        let response = prometheus_metrics().await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static(
                "text/plain; version=0.0.4; charset=utf-8"
            ))
        );
    }
}
