//! Read-only full-text search index using Tantivy.

use super::analyzer;
use super::query::{compile, parse_query};
use super::types::{IndexOptions, SearchField, SearchFields, SearchHit, SearchPage, TermMatch};
use crate::common::SearchError;
use std::collections::BTreeSet;
use tantivy::collector::TopDocs;
use tantivy::schema::IndexRecordOption;
use tantivy::tokenizer::TextAnalyzer;
use tantivy::{DocAddress, DocSet, IndexReader, Postings, Searcher, Term};

/// Built search index over a document store.
///
/// Nothing mutates the index after construction, so a single value can be
/// shared by any number of concurrent readers.
pub struct SearchIndex {
    reader: IndexReader,
    fields: SearchFields,
    options: IndexOptions,
    analyzer: TextAnalyzer,
    doc_count: usize,
}

impl SearchIndex {
    pub(crate) fn new(
        reader: IndexReader,
        fields: SearchFields,
        options: IndexOptions,
        doc_count: usize,
    ) -> Self {
        Self {
            reader,
            fields,
            options,
            analyzer: analyzer::build_analyzer(),
            doc_count,
        }
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// All matching documents, highest score first, ties by id ascending.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self.search_page(query, None)?.hits)
    }

    /// Like [`search`](Self::search), keeping at most `limit` hits.
    pub fn search_limited(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        Ok(self.search_page(query, Some(limit))?.hits)
    }

    /// Ranked hits cut to `limit`, with the number of matches before the cut.
    pub fn search_page(&self, query: &str, limit: Option<usize>) -> Result<SearchPage, SearchError> {
        if query.trim().is_empty() {
            return Ok(SearchPage::default());
        }

        let clauses = parse_query(query)?;
        let mut analyzer = self.analyzer.clone();
        let Some(plan) = compile(&clauses, &self.fields, &self.options, &mut analyzer)? else {
            return Ok(SearchPage::default());
        };

        let searcher = self.reader.searcher();
        let num_docs = searcher.num_docs() as usize;
        if num_docs == 0 {
            return Ok(SearchPage::default());
        }

        // Collect everything so ties can be ordered by id before truncating.
        let top = searcher.search(&*plan.query, &TopDocs::with_limit(num_docs))?;

        let mut ranked = Vec::with_capacity(top.len());
        for (score, addr) in top {
            let doc = searcher.doc(addr)?;
            let id = doc
                .get_first(self.fields.id)
                .and_then(|v| v.as_text())
                .unwrap_or("")
                .to_string();
            ranked.push((score, id, addr));
        }
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        let total = ranked.len();
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }

        let mut hits = Vec::with_capacity(ranked.len());
        for (score, id, addr) in ranked {
            let matches = self.match_data(&searcher, addr, &plan.exact_terms)?;
            hits.push(SearchHit { id, score, matches });
        }
        Ok(SearchPage { total, hits })
    }

    /// Positions of each exact query term inside the document at `addr`.
    fn match_data(
        &self,
        searcher: &Searcher,
        addr: DocAddress,
        terms: &BTreeSet<(SearchField, String)>,
    ) -> Result<Vec<TermMatch>, SearchError> {
        let segment = searcher.segment_reader(addr.segment_ord);
        let record = if self.options.retain_positions {
            IndexRecordOption::WithFreqsAndPositions
        } else {
            IndexRecordOption::WithFreqs
        };

        let mut out = Vec::new();
        for (field, text) in terms {
            let tfield = self.fields.get(*field);
            let inverted = segment.inverted_index(tfield)?;
            let term = Term::from_field_text(tfield, text);
            let Some(mut postings) = inverted.read_postings(&term, record)? else {
                continue;
            };
            if postings.doc() > addr.doc_id || postings.seek(addr.doc_id) != addr.doc_id {
                continue;
            }
            let mut positions = Vec::new();
            if self.options.retain_positions {
                postings.positions(&mut positions);
            }
            out.push(TermMatch {
                term: text.clone(),
                field: *field,
                positions,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::IndexBuilder;
    use super::*;
    use crate::store::{Document, DocumentStore};

    fn store() -> DocumentStore {
        DocumentStore::new(vec![
            Document::chapter("a", "1", "Getting started", "Install the tools first."),
            Document::chapter("b", "2", "R basics", "Vectors, basics of functions."),
            Document::chapter("c", "3", "Locales", "Every locale formats dates."),
            Document::chapter("d", "4", "Parsing dates", "Dates and times, locales revisited."),
        ])
    }

    fn ids(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.id.as_str()).collect()
    }

    fn built() -> SearchIndex {
        IndexBuilder::default().build(&store()).unwrap()
    }

    #[test]
    fn test_blank_queries_are_empty() {
        let index = built();
        assert!(index.search("").unwrap().is_empty());
        assert!(index.search("   \t\n").unwrap().is_empty());
        assert!(index.search("?!").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_term_contributes_nothing() {
        let index = built();
        assert!(index.search("zzz").unwrap().is_empty());
        assert_eq!(ids(&index.search("zzz basics").unwrap()), ["b"]);
    }

    #[test]
    fn test_title_outranks_body() {
        let index = built();
        let hits = index.search("locales").unwrap();
        assert_eq!(ids(&hits), ["c", "d"]);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_ties_break_by_id() {
        let store = DocumentStore::new(vec![
            Document::chapter("zeta", "1", "Joining tables", ""),
            Document::chapter("alpha", "2", "Joining tables", ""),
            Document::chapter("mid", "3", "Joining tables", ""),
        ]);
        let index = IndexBuilder::default().build(&store).unwrap();
        let hits = index.search("tables").unwrap();
        assert_eq!(ids(&hits), ["alpha", "mid", "zeta"]);
        assert_eq!(hits[0].score, hits[2].score);
        assert_eq!(ids(&index.search_limited("tables", 2).unwrap()), ["alpha", "mid"]);
        assert!(index.search_limited("tables", 0).unwrap().is_empty());
    }

    #[test]
    fn test_page_total_counts_all_matches() {
        let index = built();
        let page = index.search_page("locales dates basics", Some(1)).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.hits.len(), 1);

        let page = index.search_page("locales", Some(0)).unwrap();
        assert_eq!(page.total, 2);
        assert!(page.hits.is_empty());

        assert_eq!(index.search_page("  ", Some(5)).unwrap(), SearchPage::default());
        assert_eq!(index.search_page("zzz", None).unwrap().total, 0);
    }

    #[test]
    fn test_required_terms() {
        let index = built();
        assert_eq!(ids(&index.search("+locales formats").unwrap()), ["c", "d"]);
        assert_eq!(ids(&index.search("+basics +locales").unwrap()), Vec::<&str>::new());
    }

    #[test]
    fn test_prohibited_only_matches_rest() {
        let index = built();
        assert_eq!(ids(&index.search("-dates").unwrap()), ["a", "b"]);
        assert_eq!(ids(&index.search("locales -parsing").unwrap()), ["c"]);
    }

    #[test]
    fn test_field_scope() {
        let index = built();
        assert_eq!(ids(&index.search("title:dates").unwrap()), ["d"]);
        assert_eq!(ids(&index.search("body:install").unwrap()), ["a"]);
        assert!(index.search("title:install").unwrap().is_empty());
        assert!(matches!(
            index.search("chapter:one"),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_prefix_and_fuzzy() {
        let index = built();
        assert_eq!(ids(&index.search("pars*").unwrap()), ["d"]);
        assert_eq!(ids(&index.search("instal~1").unwrap()), ["a"]);
        assert_eq!(ids(&index.search("instal").unwrap()), Vec::<&str>::new());
    }

    #[test]
    fn test_match_positions() {
        let index = built();
        let hits = index.search("dates").unwrap();
        let d = hits.iter().find(|h| h.id == "d").unwrap();
        assert_eq!(
            d.matches,
            [
                TermMatch {
                    term: "dates".into(),
                    field: SearchField::Title,
                    positions: vec![1],
                },
                TermMatch {
                    term: "dates".into(),
                    field: SearchField::Body,
                    positions: vec![0],
                },
            ]
        );
    }

    #[test]
    fn test_positions_can_be_disabled() {
        let options = IndexOptions {
            retain_positions: false,
            ..IndexOptions::default()
        };
        let index = IndexBuilder::new(options).build(&store()).unwrap();
        let hits = index.search("title:basics").unwrap();
        assert_eq!(ids(&hits), ["b"]);
        assert_eq!(hits[0].matches.len(), 1);
        assert!(hits[0].matches[0].positions.is_empty());
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let first = built().search("dates locales basics").unwrap();
        let second = built().search("dates locales basics").unwrap();
        assert_eq!(first, second);
    }
}
