//! Structured request logging middleware for the HTTP server
//!
//! Emits one `info` event per request with method, path, status and latency.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Maximum length for the logged query string before truncation
const MAX_QUERY_LENGTH: usize = 30;

/// Truncation suffix for long query strings
const TRUNCATION_SUFFIX: &str = "...";

/// Request logging middleware
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(truncate_query).unwrap_or_default();

    let response = next.run(request).await;
    let latency_ms = start_time.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    tracing::info!(
        method = %method,
        path = %path,
        query = %query,
        status,
        latency_ms,
        "Handled request"
    );

    response
}

/// Truncate a query string on a character boundary
fn truncate_query(query: &str) -> String {
    if query.chars().count() <= MAX_QUERY_LENGTH {
        return query.to_string();
    }
    let truncated: String = query.chars().take(MAX_QUERY_LENGTH).collect();
    format!("{truncated}{TRUNCATION_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_kept() {
        assert_eq!(truncate_query("category=ops"), "category=ops");
    }

    #[test]
    fn test_long_query_truncated() {
        let query = format!("category={}", "x".repeat(50));
        let truncated = truncate_query(&query);
        assert_eq!(truncated.chars().count(), MAX_QUERY_LENGTH + TRUNCATION_SUFFIX.len());
        assert!(truncated.ends_with(TRUNCATION_SUFFIX));
    }

    #[test]
    fn test_multibyte_query_truncated_safely() {
        let query = "é".repeat(40);
        let truncated = truncate_query(&query);
        assert!(truncated.starts_with("ééé"));
        assert!(truncated.ends_with(TRUNCATION_SUFFIX));
    }
}
