//! HTTP request handlers.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{body::Incoming, header, Request, Response, StatusCode};
use log::*;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use std::sync::Arc;

use crate::api::metrics::METRICS;
use crate::common::{DatabaseError, SearchError};
use crate::config::SearchConfig;
use crate::db::{Database, SearchResult};

/// Search response structure.
#[derive(Serialize)]
pub struct SearchResponse {
    query: String,
    /// Matches before `limit` was applied.
    total: usize,
    results: Vec<SearchResult>,
}

/// Metrics snapshot for JSON API.
#[derive(Serialize)]
pub struct MetricsSnapshot {
    // Index state
    index_built: bool,
    indexed_docs: u64,
    uptime_secs: u64,
    start_time: u64,

    // Build counters
    index_builds: u64,
    build_failures: u64,
    load_failures: u64,

    // Query counters
    queries: u64,
    empty_queries: u64,
    invalid_queries: u64,
    unbuilt_queries: u64,
    query_errors: u64,
    hits_returned: u64,
}

/// Get current metrics snapshot.
pub fn metrics_snapshot() -> MetricsSnapshot {
    use std::sync::atomic::Ordering::Relaxed;
    MetricsSnapshot {
        index_built: METRICS.index_built.load(Relaxed),
        indexed_docs: METRICS.indexed_docs.load(Relaxed),
        uptime_secs: METRICS.uptime_secs(),
        start_time: METRICS.start_time.load(Relaxed),

        index_builds: METRICS.index_builds.load(Relaxed),
        build_failures: METRICS.build_failures.load(Relaxed),
        load_failures: METRICS.load_failures.load(Relaxed),

        queries: METRICS.queries.load(Relaxed),
        empty_queries: METRICS.empty_queries.load(Relaxed),
        invalid_queries: METRICS.invalid_queries.load(Relaxed),
        unbuilt_queries: METRICS.unbuilt_queries.load(Relaxed),
        query_errors: METRICS.query_errors.load(Relaxed),
        hits_returned: METRICS.hits_returned.load(Relaxed),
    }
}

/// Parse a query parameter from a request.
///
/// Values are form-decoded: `+` is a space and a literal plus is `%2B`.
pub fn parse_query_param(req: &Request<Incoming>, key: &str) -> Option<String> {
    query_param(req.uri().query()?, key)
}

fn query_param(query: &str, key: &str) -> Option<String> {
    for pair in query.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        if k == key {
            let raw = it.next().unwrap_or_default().replace('+', " ");
            return percent_decode_str(&raw)
                .decode_utf8()
                .ok()
                .map(|s| s.into_owned());
        }
    }
    None
}

/// Create a JSON response.
pub fn json_response<T: Serialize>(value: &T, status: StatusCode) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut r = Response::new(Full::new(Bytes::from(body)));
            *r.status_mut() = status;
            r.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
            r
        }
        Err(e) => {
            error!("json serialize error: {}", e);
            let mut r = Response::new(Full::new(Bytes::from_static(
                b"{\"error\":\"serialization\"}",
            )));
            *r.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            r
        }
    }
}

fn error_response(message: String, status: StatusCode) -> Response<Full<Bytes>> {
    json_response(&serde_json::json!({ "error": message }), status)
}

/// Resolve the `limit` parameter against configured defaults and caps.
fn effective_limit(raw: Option<&str>, cfg: &SearchConfig) -> Result<usize, String> {
    let requested = match raw {
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| format!("bad limit {:?}", s))?,
        None => cfg.default_limit,
    };
    Ok(requested.min(cfg.max_limit))
}

/// Handle search API request.
pub async fn handle_search(
    db: Arc<Database>,
    cfg: &SearchConfig,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    let Some(q) = parse_query_param(&req, "q") else {
        return error_response("missing query".into(), StatusCode::BAD_REQUEST);
    };
    let limit = match effective_limit(parse_query_param(&req, "limit").as_deref(), cfg) {
        Ok(n) => n,
        Err(msg) => return error_response(msg, StatusCode::BAD_REQUEST),
    };

    match db.search(&q, Some(limit)) {
        Ok(page) => json_response(
            &SearchResponse {
                query: q,
                total: page.total,
                results: page.results,
            },
            StatusCode::OK,
        ),
        Err(e) => search_error_response(e),
    }
}

fn search_error_response(e: SearchError) -> Response<Full<Bytes>> {
    let status = match &e {
        SearchError::NotBuilt => StatusCode::SERVICE_UNAVAILABLE,
        SearchError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        SearchError::Engine(_) => {
            error!("search failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(e.to_string(), status)
}

/// Handle single-document lookup.
pub async fn handle_document(db: Arc<Database>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let Some(id) = parse_query_param(&req, "id") else {
        return error_response("missing id".into(), StatusCode::BAD_REQUEST);
    };
    match db.document(&id) {
        Ok(Some(doc)) => json_response(&doc, StatusCode::OK),
        Ok(None) => error_response(format!("no document {:?}", id), StatusCode::NOT_FOUND),
        Err(e) => search_error_response(e),
    }
}

/// Reload the configured source and rebuild the index.
pub async fn handle_rebuild(db: Arc<Database>) -> Response<Full<Bytes>> {
    let result = tokio::task::spawn_blocking(move || db.reload()).await;
    match result {
        Ok(Ok(documents)) => {
            info!("rebuilt search index: {} documents", documents);
            json_response(&serde_json::json!({ "documents": documents }), StatusCode::OK)
        }
        Ok(Err(e)) => {
            warn!("rebuild failed: {}", e);
            let status = match e {
                DatabaseError::NoSource => StatusCode::CONFLICT,
                DatabaseError::Load(_) | DatabaseError::Build(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            };
            error_response(e.to_string(), status)
        }
        Err(e) => {
            error!("rebuild task failed: {}", e);
            error_response("rebuild task failed".into(), StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_decoding() {
        assert_eq!(
            query_param("q=%2Btidy%20-data&limit=5", "q").as_deref(),
            Some("+tidy -data")
        );
        assert_eq!(query_param("q=a&limit=5", "limit").as_deref(), Some("5"));
        assert_eq!(query_param("q", "q").as_deref(), Some(""));
        assert_eq!(query_param("q=a", "id"), None);
    }

    #[test]
    fn test_query_param_form_spaces() {
        assert_eq!(query_param("q=a+-b", "q").as_deref(), Some("a -b"));
        assert_eq!(
            query_param("q=%2Bdata+-table", "q").as_deref(),
            Some("+data -table")
        );
    }

    #[test]
    fn test_effective_limit() {
        let cfg = SearchConfig {
            default_limit: 10,
            max_limit: 50,
        };
        assert_eq!(effective_limit(None, &cfg), Ok(10));
        assert_eq!(effective_limit(Some("3"), &cfg), Ok(3));
        assert_eq!(effective_limit(Some("500"), &cfg), Ok(50));
        assert!(effective_limit(Some("many"), &cfg).is_err());
    }
}
