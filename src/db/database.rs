//! Runtime holder of the current document store and its index.

use crate::api::metrics::METRICS;
use crate::common::{BuildError, DatabaseError, SearchError};
use crate::config::Config;
use crate::engine::{IndexBuilder, IndexOptions, SearchIndex};
use crate::store::{load_store, Document, DocumentStore};

use super::types::{ResultPage, SearchResult};

use log::*;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A store together with the index built from it.
struct Snapshot {
    store: DocumentStore,
    index: SearchIndex,
}

/// Search database: either unbuilt, or holding one built snapshot.
///
/// Queries take a reference-counted snapshot and release the lock before
/// searching; a rebuild swaps the snapshot without waiting for them.
pub struct Database {
    builder: IndexBuilder,
    source: Option<PathBuf>,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl Database {
    /// Create an unbuilt database with no source file.
    pub fn new(options: IndexOptions) -> Self {
        Self {
            builder: IndexBuilder::new(options),
            source: None,
            current: RwLock::new(None),
        }
    }

    /// Create an unbuilt database that reloads from `path`.
    pub fn with_source(options: IndexOptions, path: impl Into<PathBuf>) -> Self {
        Self {
            source: Some(path.into()),
            ..Self::new(options)
        }
    }

    /// Open the database described by `cfg` and attempt the initial build.
    ///
    /// A failed initial load leaves the database unbuilt rather than
    /// failing, so the server can come up and be rebuilt later.
    pub fn open(cfg: &Config) -> Arc<Self> {
        let db = Self::with_source(IndexOptions::from(&cfg.index), &cfg.index.docs_path);
        match db.reload() {
            Ok(n) => info!("search index ready: {} documents from {}", n, cfg.index.docs_path),
            Err(e) => error!(
                "search index unavailable ({}); serving unbuilt until rebuilt",
                e
            ),
        }
        Arc::new(db)
    }

    /// Build an index over `store` and make it current.
    ///
    /// On failure the previous snapshot, if any, stays in place.
    pub fn install(&self, store: DocumentStore) -> Result<usize, BuildError> {
        let index = match self.builder.build(&store) {
            Ok(index) => index,
            Err(e) => {
                METRICS.build_failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };
        let count = index.doc_count();
        *self.current.write() = Some(Arc::new(Snapshot { store, index }));
        METRICS.record_build(count);
        Ok(count)
    }

    /// Re-read the source file and rebuild.
    pub fn reload(&self) -> Result<usize, DatabaseError> {
        let path = self.source.as_ref().ok_or(DatabaseError::NoSource)?;
        let store = load_store(path).map_err(|e| {
            METRICS.load_failures.fetch_add(1, Ordering::Relaxed);
            e
        })?;
        if let Some(style) = store.search_style() {
            debug!("document source declares search style {:?}", style);
        }
        Ok(self.install(store)?)
    }

    pub fn is_built(&self) -> bool {
        self.current.read().is_some()
    }

    /// Documents in the current snapshot, 0 when unbuilt.
    pub fn doc_count(&self) -> usize {
        self.current
            .read()
            .as_ref()
            .map_or(0, |s| s.store.len())
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>, SearchError> {
        self.current.read().clone().ok_or(SearchError::NotBuilt)
    }

    /// Search the current snapshot and join each hit with its document.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<ResultPage, SearchError> {
        let snap = match self.snapshot() {
            Ok(s) => s,
            Err(e) => {
                METRICS.unbuilt_queries.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let page = match snap.index.search_page(query, limit) {
            Ok(p) => p,
            Err(e) => {
                match &e {
                    SearchError::InvalidQuery(_) => &METRICS.invalid_queries,
                    _ => &METRICS.query_errors,
                }
                .fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        let results: Vec<SearchResult> = page
            .hits
            .into_iter()
            .filter_map(|hit| {
                let doc = snap.store.get(&hit.id)?;
                Some(SearchResult::new(hit, doc))
            })
            .collect();
        METRICS.record_query(results.len());
        Ok(ResultPage {
            total: page.total,
            results,
        })
    }

    /// Look up one document of the current snapshot.
    pub fn document(&self, id: &str) -> Result<Option<Document>, SearchError> {
        Ok(self.snapshot()?.store.get(id).cloned())
    }
}
