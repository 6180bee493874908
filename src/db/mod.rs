//! Database module holding the searchable document snapshot.
//!
//! This module provides:
//! - `Database` - Current store and index, rebuildable from its source
//! - `SearchResult` / `ResultPage` - Hits joined with document metadata

mod database;
mod types;

pub use database::Database;
pub use types::{ResultPage, SearchResult};
