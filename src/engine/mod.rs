//! Indexing engine.
//!
//! The only engine is the in-memory full-text index in [`search`].

pub mod search;

pub use search::{
    parse_query, tokenize, IndexBuilder, IndexOptions, SearchField, SearchHit, SearchIndex,
    SearchPage, TermMatch,
};
