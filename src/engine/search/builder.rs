//! One-shot construction of a [`SearchIndex`] from a document store.

use super::analyzer::{self, ANALYZER_NAME};
use super::index::SearchIndex;
use super::types::{IndexOptions, SearchFields};
use crate::common::BuildError;
use crate::store::DocumentStore;
use log::*;
use std::collections::HashSet;
use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};

/// Builds search indexes with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    options: IndexOptions,
}

impl IndexBuilder {
    pub fn new(options: IndexOptions) -> Self {
        Self { options }
    }

    /// Index every document of `store`.
    ///
    /// Duplicate identifiers are rejected before any index structure is
    /// created. Documents are written by a single indexing thread so that
    /// building twice from the same store yields the same index.
    pub fn build(&self, store: &DocumentStore) -> Result<SearchIndex, BuildError> {
        check_unique_ids(store)?;

        let schema = build_schema(self.options.retain_positions);
        let fields = SearchFields::load(&schema)?;
        let index = Index::create_in_ram(schema);
        analyzer::register(&index);

        let mut writer: IndexWriter =
            index.writer_with_num_threads(1, self.options.writer_heap_bytes)?;
        for doc in store {
            let mut tdoc = tantivy::Document::new();
            tdoc.add_text(fields.id, &doc.id);
            tdoc.add_text(fields.title, &doc.title);
            tdoc.add_text(fields.body, &doc.body);
            writer.add_document(tdoc)?;
        }
        writer.commit()?;
        writer.wait_merging_threads()?;

        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        info!(
            "built search index over {} documents (positions: {})",
            store.len(),
            self.options.retain_positions
        );
        Ok(SearchIndex::new(
            reader,
            fields,
            self.options.clone(),
            store.len(),
        ))
    }
}

fn check_unique_ids(store: &DocumentStore) -> Result<(), BuildError> {
    let mut seen = HashSet::with_capacity(store.len());
    for doc in store {
        if !seen.insert(doc.id.as_str()) {
            warn!("rejecting document store: duplicate id {:?}", doc.id);
            return Err(BuildError::DuplicateId(doc.id.clone()));
        }
    }
    Ok(())
}

pub(crate) fn build_schema(retain_positions: bool) -> Schema {
    let mut builder = Schema::builder();
    let record = if retain_positions {
        IndexRecordOption::WithFreqsAndPositions
    } else {
        IndexRecordOption::WithFreqs
    };
    let text_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(ANALYZER_NAME)
            .set_index_option(record),
    );

    builder.add_text_field("id", STRING | STORED);
    builder.add_text_field("title", text_options.clone());
    builder.add_text_field("body", text_options);

    builder.build()
}
