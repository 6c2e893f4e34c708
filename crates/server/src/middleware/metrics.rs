//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Normalize request paths to avoid high-cardinality labels.
/// Replaces NCT id segments with `:id` so all per-trial requests share one label.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|seg| if is_nct_id(seg) { ":id" } else { seg })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_nct_id(segment: &str) -> bool {
    segment
        .strip_prefix("NCT")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::normalize_path;

    #[test]
    fn replaces_nct_segments_only() {
        assert_eq!(normalize_path("/api/trials/NCT00000001"), "/api/trials/:id");
        assert_eq!(normalize_path("/api/trials/search"), "/api/trials/search");
        assert_eq!(normalize_path("/api/trials/NCTxyz"), "/api/trials/NCTxyz");
    }
}
