//! Error types shared across the docindex codebase.

use std::fmt;
use std::io;

/// Error raised while reading a document source into a store.
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be read
    Io(io::Error),
    /// The source is not a JSON array or a generated index script
    Syntax(String),
    /// A record is missing a required field or has a field of the wrong shape
    MalformedRecord { index: usize, reason: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {}", e),
            LoadError::Syntax(msg) => write!(f, "unreadable document source: {}", msg),
            LoadError::MalformedRecord { index, reason } => {
                write!(f, "malformed document record #{}: {}", index, reason)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Syntax(e.to_string())
    }
}

/// Error raised while building an index from a store.
#[derive(Debug)]
pub enum BuildError {
    /// Two documents share an identifier
    DuplicateId(String),
    /// The underlying index engine failed
    Engine(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::DuplicateId(id) => write!(f, "duplicate document id {:?}", id),
            BuildError::Engine(msg) => write!(f, "index engine error: {}", msg),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<tantivy::TantivyError> for BuildError {
    fn from(e: tantivy::TantivyError) -> Self {
        BuildError::Engine(e.to_string())
    }
}

/// Error raised while answering a query.
#[derive(Debug)]
pub enum SearchError {
    /// No index has been built yet
    NotBuilt,
    /// The query text could not be parsed
    InvalidQuery(String),
    /// The underlying index engine failed
    Engine(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NotBuilt => write!(f, "search index has not been built"),
            SearchError::InvalidQuery(msg) => write!(f, "invalid search query: {}", msg),
            SearchError::Engine(msg) => write!(f, "index engine error: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<tantivy::TantivyError> for SearchError {
    fn from(e: tantivy::TantivyError) -> Self {
        SearchError::Engine(e.to_string())
    }
}

impl From<io::Error> for SearchError {
    fn from(e: io::Error) -> Self {
        SearchError::Engine(e.to_string())
    }
}

/// Error raised when the database reloads its source and rebuilds.
#[derive(Debug)]
pub enum DatabaseError {
    /// The database was created without a source file to reload from
    NoSource,
    Load(LoadError),
    Build(BuildError),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::NoSource => write!(f, "no document source configured"),
            DatabaseError::Load(e) => write!(f, "load failed: {}", e),
            DatabaseError::Build(e) => write!(f, "build failed: {}", e),
        }
    }
}

impl std::error::Error for DatabaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatabaseError::Load(e) => Some(e),
            DatabaseError::Build(e) => Some(e),
            DatabaseError::NoSource => None,
        }
    }
}

impl From<LoadError> for DatabaseError {
    fn from(e: LoadError) -> Self {
        DatabaseError::Load(e)
    }
}

impl From<BuildError> for DatabaseError {
    fn from(e: BuildError) -> Self {
        DatabaseError::Build(e)
    }
}
