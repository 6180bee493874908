//! External interfaces:
//! - `http` - HTTP search API and search page
//! - `metrics` - process-wide counters

pub mod http;
pub mod metrics;

pub use http::{serve_http, serve_listener};
pub use metrics::METRICS;
