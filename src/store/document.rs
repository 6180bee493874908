//! Document records and the ordered store that holds them.

use serde::{Serialize, Serializer};
use std::fmt;

/// Structural label a documentation generator attaches to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocKind {
    Preface,
    Chapter,
    Section,
    Subsection,
    Appendix,
    Other(String),
}

impl DocKind {
    /// Map a generator label onto a kind. Unknown labels are kept verbatim.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Preface" => DocKind::Preface,
            "Chapter" => DocKind::Chapter,
            "Section" => DocKind::Section,
            "Subsection" => DocKind::Subsection,
            "Appendix" => DocKind::Appendix,
            other => DocKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocKind::Preface => "Preface",
            DocKind::Chapter => "Chapter",
            DocKind::Section => "Section",
            DocKind::Subsection => "Subsection",
            DocKind::Appendix => "Appendix",
            DocKind::Other(label) => label,
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DocKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One indexable unit of content, such as a book chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    /// Nesting depth, 1 for top-level divisions.
    pub level: u8,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: DocKind,
    /// Display number, empty for unnumbered divisions.
    pub number: String,
    pub title: String,
    pub body: String,
}

impl Document {
    /// Convenience constructor for a top-level chapter.
    #[doc(hidden)]
    pub fn chapter(id: &str, number: &str, title: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            level: 1,
            url: format!("{id}.html"),
            kind: DocKind::Chapter,
            number: number.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Ordered, immutable sequence of documents.
///
/// Identifier uniqueness is checked by the index builder, not here, so a
/// store read from a faulty source can still be inspected.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    search_style: Option<String>,
}

impl DocumentStore {
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs,
            search_style: None,
        }
    }

    pub fn with_search_style(mut self, style: Option<String>) -> Self {
        self.search_style = style;
        self
    }

    /// Presentation hint emitted by the generator (e.g. `"textbook"`).
    pub fn search_style(&self) -> Option<&str> {
        self.search_style.as_deref()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    /// First document carrying `id`.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.docs.iter().find(|d| d.id == id)
    }
}

impl<'a> IntoIterator for &'a DocumentStore {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}
