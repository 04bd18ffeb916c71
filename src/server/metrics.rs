use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all musicrec metrics
const PREFIX: &str = "musicrec";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Domain Metrics
    pub static ref LISTENS_RECORDED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_listens_recorded_total"), "Listen events received"),
        &["outcome"]
    ).expect("Failed to create listens_recorded_total metric");

    pub static ref RECOMMENDATIONS_SERVED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_recommendations_served_total"), "Recommendation requests by mode"),
        &["mode"]
    ).expect("Failed to create recommendations_served_total metric");

    pub static ref IMPORTED_ROWS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_imported_rows_total"), "Rows imported from CSV uploads"),
        &["kind"]
    ).expect("Failed to create imported_rows_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(LISTENS_RECORDED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(RECOMMENDATIONS_SERVED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(IMPORTED_ROWS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record a received listen event; outcome is "created" or "duplicate"
pub fn record_listen(created: bool) {
    let outcome = if created { "created" } else { "duplicate" };
    LISTENS_RECORDED_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record a served recommendation request
pub fn record_recommendation(mode: &str) {
    RECOMMENDATIONS_SERVED_TOTAL
        .with_label_values(&[mode])
        .inc();
}

/// Record rows imported from a CSV upload
pub fn record_imported_rows(kind: &str, count: usize) {
    IMPORTED_ROWS_TOTAL
        .with_label_values(&[kind])
        .inc_by(count as f64);
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
