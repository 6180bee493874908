//! Configuration type definitions.

/// Index construction settings.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    pub docs_path: String,
    pub title_boost: f32,
    pub body_boost: f32,
    pub retain_positions: bool,
    pub writer_heap_bytes: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            docs_path: "output/web/lunr-pretext-search-index.js".into(),
            title_boost: 2.0,
            body_boost: 1.0,
            retain_positions: true,
            writer_heap_bytes: 50_000_000,
        }
    }
}

/// Query defaults and caps.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 25,
            max_limit: 100,
        }
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug)]
pub struct Http {
    pub bind_addr: String,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
        }
    }
}

/// Root configuration container.
#[derive(Clone, Debug)]
pub struct Config {
    pub index: IndexConfig,
    pub search: SearchConfig,
    pub http: Option<Http>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            search: SearchConfig::default(),
            http: Some(Http::default()),
        }
    }
}
