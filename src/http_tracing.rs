use axum::{body::Body, http::Request};
use tower_http::trace::{HttpMakeClassifier, TraceLayer};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Wraps every request in an `http_request` span with a fresh trace id.
pub fn http_trace_layer() -> TraceLayer<HttpMakeClassifier, fn(&Request<Body>) -> Span> {
    TraceLayer::new_for_http().make_span_with(request_span as fn(&Request<Body>) -> Span)
}

fn request_span(request: &Request<Body>) -> Span {
    let trace_id = Uuid::new_v4();

    info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        path = %request.uri().path(),
        user_agent = ?request.headers().get("user-agent"),
    )
}
