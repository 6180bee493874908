//! HTTP API server module.
//!
//! Provides:
//! - Search page at `/`
//! - Search API at `/api/search`
//! - Document lookup at `/api/docs`
//! - Index rebuild at `/api/rebuild`
//! - JSON metrics at `/api/metrics`
//! - Prometheus metrics at `/metrics`

mod handlers;
mod router;
mod templates;

pub use handlers::{metrics_snapshot, MetricsSnapshot, SearchResponse};
pub use router::{handle_http_connection, serve_http, serve_listener};
