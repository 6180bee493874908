//! Database type definitions.

use crate::engine::{SearchHit, TermMatch};
use crate::store::{DocKind, Document};
use serde::Serialize;

/// A search hit joined with the document it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f32,
    pub url: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: DocKind,
    pub number: String,
    pub level: u8,
    pub matches: Vec<TermMatch>,
}

/// Joined results plus the match count before any limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    pub total: usize,
    pub results: Vec<SearchResult>,
}

impl SearchResult {
    pub fn new(hit: SearchHit, doc: &Document) -> Self {
        Self {
            id: hit.id,
            score: hit.score,
            url: doc.url.clone(),
            title: doc.title.clone(),
            kind: doc.kind.clone(),
            number: doc.number.clone(),
            level: doc.level,
            matches: hit.matches,
        }
    }
}
