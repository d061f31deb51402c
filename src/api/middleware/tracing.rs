//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing layer shared by the public and admin routers.
///
/// Opens an `INFO` span per request (method, URI, version) and logs the status
/// and latency in milliseconds on response:
///
/// ```text
/// INFO request{method=GET uri=/old-page version=HTTP/1.1}: finished processing request latency=0 ms status=308
/// INFO request{method=POST uri=/redirecter/reload version=HTTP/1.1}: finished processing request latency=41 ms status=200
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
