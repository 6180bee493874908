//! Global metrics collection using atomic counters.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide search metrics.
#[derive(Default)]
pub struct Metrics {
    pub start_time: AtomicU64,
    pub shutting_down: AtomicBool,

    // Index state (gauges)
    pub indexed_docs: AtomicU64,
    pub index_built: AtomicBool,

    // Build counters
    pub index_builds: AtomicU64,
    pub build_failures: AtomicU64,
    pub load_failures: AtomicU64,

    // Query counters
    pub queries: AtomicU64,
    pub empty_queries: AtomicU64,
    pub invalid_queries: AtomicU64,
    pub unbuilt_queries: AtomicU64,
    pub query_errors: AtomicU64,
    pub hits_returned: AtomicU64,
}

/// Global metrics singleton.
pub static METRICS: once_cell::sync::Lazy<&'static Metrics> = once_cell::sync::Lazy::new(|| {
    let m: &'static Metrics = Box::leak(Box::new(Metrics::default()));
    m.start_time.store(now_secs(), Ordering::Relaxed);
    m
});

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl Metrics {
    /// Record a successful build of `docs` documents.
    pub fn record_build(&self, docs: usize) {
        self.index_builds.fetch_add(1, Ordering::Relaxed);
        self.indexed_docs.store(docs as u64, Ordering::Relaxed);
        self.index_built.store(true, Ordering::Relaxed);
    }

    /// Record a query and the number of hits it produced.
    pub fn record_query(&self, hits: usize) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if hits == 0 {
            self.empty_queries.fetch_add(1, Ordering::Relaxed);
        }
        self.hits_returned.fetch_add(hits as u64, Ordering::Relaxed);
    }

    /// Get current uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        let start = self.start_time.load(Ordering::Relaxed);
        if start == 0 {
            return 0;
        }
        now_secs().saturating_sub(start)
    }

    /// Render metrics in Prometheus exposition format.
    pub fn render_prometheus(&self) -> String {
        let g = |name: &str, help: &str, val: u64| -> String {
            format!(
                "# HELP {0} {1}\n# TYPE {0} counter\n{0} {2}\n",
                name, help, val
            )
        };
        let gauge = |name: &str, help: &str, val: u64| -> String {
            format!(
                "# HELP {0} {1}\n# TYPE {0} gauge\n{0} {2}\n",
                name, help, val
            )
        };

        let mut s = String::with_capacity(2048);

        // Index state
        s.push_str(&gauge(
            "docindex_indexed_docs",
            "Documents in the current search index",
            self.indexed_docs.load(Ordering::Relaxed),
        ));
        s.push_str(&gauge(
            "docindex_index_built",
            "Whether a search index is available (0 or 1)",
            self.index_built.load(Ordering::Relaxed) as u64,
        ));
        s.push_str(&gauge(
            "docindex_uptime_seconds",
            "Server uptime in seconds",
            self.uptime_secs(),
        ));

        // Build counters
        s.push_str(&g(
            "docindex_index_builds_total",
            "Successful index builds",
            self.index_builds.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_build_failures_total",
            "Index builds rejected (duplicate ids, engine errors)",
            self.build_failures.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_load_failures_total",
            "Document sources that failed to load",
            self.load_failures.load(Ordering::Relaxed),
        ));

        // Query counters
        s.push_str(&g(
            "docindex_queries_total",
            "Queries answered",
            self.queries.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_empty_queries_total",
            "Queries answered with no hits",
            self.empty_queries.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_invalid_queries_total",
            "Queries rejected as unparsable",
            self.invalid_queries.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_unbuilt_queries_total",
            "Queries received before an index was built",
            self.unbuilt_queries.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_query_errors_total",
            "Queries failed by the index engine",
            self.query_errors.load(Ordering::Relaxed),
        ));
        s.push_str(&g(
            "docindex_hits_returned_total",
            "Hits returned across all queries",
            self.hits_returned.load(Ordering::Relaxed),
        ));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_query_counts_empty() {
        let m = Metrics::default();
        m.record_query(3);
        m.record_query(0);
        assert_eq!(m.queries.load(Ordering::Relaxed), 2);
        assert_eq!(m.empty_queries.load(Ordering::Relaxed), 1);
        assert_eq!(m.hits_returned.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_render_prometheus() {
        let m = Metrics::default();
        m.record_build(22);
        let s = m.render_prometheus();
        assert!(s.contains("# TYPE docindex_indexed_docs gauge\ndocindex_indexed_docs 22\n"));
        assert!(s.contains("docindex_index_built 1\n"));
        assert!(s.contains("docindex_index_builds_total 1\n"));
        assert!(s.contains("docindex_uptime_seconds 0\n"));
    }
}
