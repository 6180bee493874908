//! Reading document sources into a [`DocumentStore`].
//!
//! Two containers are accepted: a bare JSON array of records, and the
//! script a PreTeXt build writes next to its HTML
//! (`var ptx_lunr_docs = [ ... ];` followed by the lunr bootstrap).

use super::document::{DocKind, Document, DocumentStore};
use crate::common::LoadError;
use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::{fs, path::Path};

const DOCS_VAR: &str = "ptx_lunr_docs";
const STYLE_VAR: &str = "ptx_lunr_search_style";

/// Wire shape of one record; every field is required.
#[derive(Deserialize)]
struct RawDocument {
    id: String,
    level: String,
    url: String,
    #[serde(rename = "type")]
    kind: String,
    number: String,
    title: String,
    body: String,
}

/// Load a document store from a file.
pub fn load_store(path: &Path) -> Result<DocumentStore, LoadError> {
    let src = fs::read_to_string(path)?;
    let store = parse_store(&src)?;
    debug!("loaded {} documents from {}", store.len(), path.display());
    Ok(store)
}

/// Parse a document store from the text of a JSON array or generated script.
pub fn parse_store(src: &str) -> Result<DocumentStore, LoadError> {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let trimmed = src.trim_start();
    let (records, style) = if trimmed.starts_with('[') {
        (first_value::<Vec<serde_json::Value>>(trimmed)?, None)
    } else {
        let records = match assigned_value(src, DOCS_VAR) {
            Some(rest) => first_value::<Vec<serde_json::Value>>(rest)?,
            None => {
                return Err(LoadError::Syntax(format!(
                    "neither a JSON array nor a script assigning `{DOCS_VAR}`"
                )))
            }
        };
        let style = match assigned_value(src, STYLE_VAR) {
            Some(rest) => Some(first_value::<String>(rest)?),
            None => None,
        };
        (records, style)
    };

    let docs = records
        .into_iter()
        .enumerate()
        .map(|(index, value)| convert_record(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DocumentStore::new(docs).with_search_style(style))
}

/// Text following `var <name> =`, if the script assigns that variable.
fn assigned_value<'a>(src: &'a str, name: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(pos) = src[from..].find(name) {
        let after = &src[from + pos + name.len()..];
        if let Some(rest) = after.trim_start().strip_prefix('=') {
            return Some(rest.trim_start());
        }
        from += pos + name.len();
    }
    None
}

/// Deserialize the first JSON value of `s`, ignoring whatever follows it.
fn first_value<T: DeserializeOwned>(s: &str) -> Result<T, LoadError> {
    match serde_json::Deserializer::from_str(s).into_iter::<T>().next() {
        Some(Ok(v)) => Ok(v),
        Some(Err(e)) => Err(e.into()),
        None => Err(LoadError::Syntax("unexpected end of input".into())),
    }
}

fn convert_record(index: usize, value: serde_json::Value) -> Result<Document, LoadError> {
    let malformed = |reason: String| LoadError::MalformedRecord { index, reason };

    let raw: RawDocument = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;
    if raw.id.trim().is_empty() {
        return Err(malformed("empty id".into()));
    }
    let level = raw.level.trim().parse::<u8>().map_err(|_| {
        malformed(format!(
            "level {:?} of {:?} is not a small integer",
            raw.level, raw.id
        ))
    })?;

    Ok(Document {
        id: raw.id,
        level,
        url: raw.url,
        kind: DocKind::from_label(&raw.kind),
        number: raw.number,
        title: raw.title,
        body: raw.body,
    })
}
