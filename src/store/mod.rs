//! Document store module.
//!
//! This module provides:
//! - `Document` / `DocKind` - Immutable document records
//! - `DocumentStore` - Ordered sequence of documents
//! - `load_store` / `parse_store` - Readers for generated index files

mod document;
mod loader;

pub use document::{DocKind, Document, DocumentStore};
pub use loader::{load_store, parse_store};
