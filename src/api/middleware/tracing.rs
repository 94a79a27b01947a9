//! Per-request spans and one completion event per response.

use axum::body::Body;
use axum::http::{Request, Response, header::LOCATION};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, TraceLayer};
use tracing::{Span, info, info_span};

type MakeSpan = fn(&Request<Body>) -> Span;
type OnResponse = fn(&Response<Body>, Duration, &Span);

/// Tracing layer for the whole router.
///
/// Redirects log their `Location`, so a keyword can be followed from request
/// path to destination in one line:
///
/// ```text
/// INFO request{method=GET path=/gh/rust-lang/rust}: redirected status=307 latency_ms=1 location=https://github.com/rust-lang/rust
/// ```
pub fn layer()
-> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpan, DefaultOnRequest, OnResponse> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeSpan)
        .on_response(log_response as OnResponse)
}

fn request_span(request: &Request<Body>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status().as_u16();
    let latency_ms = latency.as_millis() as u64;

    match response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(location) => info!(status, latency_ms, location, "redirected"),
        None => info!(status, latency_ms, "finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, response::Redirect, routing::get};
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_layer_passes_responses_through() {
        let app = Router::new()
            .route("/gh", get(|| async { Redirect::temporary("https://github.com") }))
            .route("/ok", get(|| async { "ok" }))
            .layer(layer());
        let server = TestServer::new(app).unwrap();

        let redirect = server.get("/gh").await;
        redirect.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(redirect.header("location"), "https://github.com");

        server.get("/ok").await.assert_text("ok");
    }
}
