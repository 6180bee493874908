//! Full-text search module for document stores.
//!
//! This module provides:
//! - `IndexBuilder` - One-shot index construction with duplicate-id checks
//! - `SearchIndex` - Tantivy-based read-only index and query interface
//! - `SearchHit` / `TermMatch` - Ranked results with match positions
//! - `parse_query` - The lunr-style query language

mod analyzer;
mod builder;
mod index;
mod query;
mod types;

pub use analyzer::{build_analyzer, tokenize, ANALYZER_NAME};
pub use builder::IndexBuilder;
pub use index::SearchIndex;
pub use query::{parse_query, Clause, Presence};
pub use types::{IndexOptions, SearchField, SearchHit, SearchPage, TermMatch};
