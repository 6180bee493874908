//! Common types shared across the codebase.
//!
//! - Error types for loading, building and searching

pub mod error;

pub use error::{BuildError, DatabaseError, LoadError, SearchError};
