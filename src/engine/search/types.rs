//! Search-related type definitions.

use crate::config::IndexConfig;
use serde::Serialize;
use tantivy::schema::{Field, Schema};

/// Full-text field of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Body,
}

impl SearchField {
    pub const ALL: [SearchField; 2] = [SearchField::Title, SearchField::Body];

    pub fn name(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Body => "body",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(SearchField::Title),
            "body" => Some(SearchField::Body),
            _ => None,
        }
    }
}

/// Index construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOptions {
    pub title_boost: f32,
    pub body_boost: f32,
    /// Record token positions so hits can report where terms occur.
    pub retain_positions: bool,
    pub writer_heap_bytes: usize,
}

impl IndexOptions {
    pub fn boost(&self, field: SearchField) -> f32 {
        match field {
            SearchField::Title => self.title_boost,
            SearchField::Body => self.body_boost,
        }
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions::from(&IndexConfig::default())
    }
}

impl From<&IndexConfig> for IndexOptions {
    fn from(cfg: &IndexConfig) -> Self {
        Self {
            title_boost: cfg.title_boost,
            body_boost: cfg.body_boost,
            retain_positions: cfg.retain_positions,
            writer_heap_bytes: cfg.writer_heap_bytes,
        }
    }
}

/// Where an exact query term occurs in a hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermMatch {
    pub term: String,
    pub field: SearchField,
    /// Token positions within the field; empty when positions are not retained.
    pub positions: Vec<u32>,
}

/// Search result hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub matches: Vec<TermMatch>,
}

/// One page of ranked hits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    /// Matching documents before the limit was applied.
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

/// Resolved schema fields.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchFields {
    pub id: Field,
    pub title: Field,
    pub body: Field,
}

impl SearchFields {
    pub fn load(schema: &Schema) -> tantivy::Result<Self> {
        Ok(Self {
            id: schema.get_field("id")?,
            title: schema.get_field("title")?,
            body: schema.get_field("body")?,
        })
    }

    pub fn get(&self, field: SearchField) -> Field {
        match field {
            SearchField::Title => self.title,
            SearchField::Body => self.body,
        }
    }
}
