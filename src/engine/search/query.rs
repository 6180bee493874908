//! Query language and compilation into tantivy queries.
//!
//! A query is a whitespace-separated list of clauses in the lunr style:
//! `[+|-][field:]text[*][~N][^N]`. Clause text is analyzed exactly like
//! document text, so one clause can expand into several terms.

use super::analyzer;
use super::types::{IndexOptions, SearchField, SearchFields};
use crate::common::SearchError;
use std::collections::BTreeSet;
use tantivy::query::{AllQuery, BooleanQuery, BoostQuery, FuzzyTermQuery, Occur, Query, RegexQuery, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::tokenizer::TextAnalyzer;
use tantivy::Term;

const MAX_EDIT_DISTANCE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Optional,
    Required,
    Prohibited,
}

impl Presence {
    fn occur(self) -> Occur {
        match self {
            Presence::Optional => Occur::Should,
            Presence::Required => Occur::Must,
            Presence::Prohibited => Occur::MustNot,
        }
    }
}

/// One parsed query clause, before analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub text: String,
    /// `None` searches every field.
    pub field: Option<SearchField>,
    pub presence: Presence,
    pub prefix: bool,
    pub edit_distance: u8,
    pub boost: f32,
}

impl Clause {
    fn fields(&self) -> Vec<SearchField> {
        match self.field {
            Some(f) => vec![f],
            None => SearchField::ALL.to_vec(),
        }
    }

    fn is_exact(&self) -> bool {
        !self.prefix && self.edit_distance == 0
    }
}

/// Split a query string into clauses.
pub fn parse_query(query: &str) -> Result<Vec<Clause>, SearchError> {
    query.split_whitespace().map(parse_clause).collect()
}

fn parse_clause(word: &str) -> Result<Clause, SearchError> {
    let (presence, rest) = match word.as_bytes().first() {
        Some(b'+') => (Presence::Required, &word[1..]),
        Some(b'-') => (Presence::Prohibited, &word[1..]),
        _ => (Presence::Optional, word),
    };

    let (field, rest) = match rest.split_once(':') {
        Some((name, text)) if !name.is_empty() => {
            let field = SearchField::from_name(name).ok_or_else(|| {
                SearchError::InvalidQuery(format!("unknown field {:?}", name))
            })?;
            (Some(field), text)
        }
        _ => (None, rest),
    };

    let (mut text, modifiers) = match rest.find(['~', '^']) {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };

    let mut clause = Clause {
        text: String::new(),
        field,
        presence,
        prefix: false,
        edit_distance: 0,
        boost: 1.0,
    };
    parse_modifiers(modifiers, &mut clause)?;

    if text.ends_with('*') {
        clause.prefix = true;
        text = text.trim_end_matches('*');
    }
    clause.text = text.to_string();
    Ok(clause)
}

/// Parse a run of `~N` and `^N` suffixes.
fn parse_modifiers(mut s: &str, clause: &mut Clause) -> Result<(), SearchError> {
    while let Some(marker) = s.chars().next() {
        let body = &s[1..];
        let end = body.find(['~', '^']).unwrap_or(body.len());
        let value = &body[..end];
        match marker {
            '~' => {
                let d = value.parse::<u8>().map_err(|_| {
                    SearchError::InvalidQuery(format!("bad edit distance {:?}", value))
                })?;
                if d > MAX_EDIT_DISTANCE {
                    return Err(SearchError::InvalidQuery(format!(
                        "edit distance {} exceeds {}",
                        d, MAX_EDIT_DISTANCE
                    )));
                }
                clause.edit_distance = d;
            }
            _ => {
                let b = value
                    .parse::<f32>()
                    .ok()
                    .filter(|b| b.is_finite() && *b > 0.0)
                    .ok_or_else(|| SearchError::InvalidQuery(format!("bad boost {:?}", value)))?;
                clause.boost = b;
            }
        }
        s = &body[end..];
    }
    Ok(())
}

/// A compiled query plus the exact terms hits should report positions for.
pub(crate) struct QueryPlan {
    pub query: Box<dyn Query>,
    pub exact_terms: BTreeSet<(SearchField, String)>,
}

/// Compile parsed clauses. Returns `None` when no clause produced a term.
pub(crate) fn compile(
    clauses: &[Clause],
    fields: &SearchFields,
    options: &IndexOptions,
    analyzer: &mut TextAnalyzer,
) -> Result<Option<QueryPlan>, SearchError> {
    let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    let mut exact_terms = BTreeSet::new();
    let mut only_prohibited = true;

    for clause in clauses {
        let clause_fields = clause.fields();
        for token in analyzer::terms(analyzer, &clause.text) {
            let mut per_field: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(clause_fields.len());
            for &field in &clause_fields {
                let q = term_query(clause, fields.get(field), &token)?;
                let boost = options.boost(field) * clause.boost;
                per_field.push((Occur::Should, Box::new(BoostQuery::new(q, boost))));
                if clause.is_exact() && clause.presence != Presence::Prohibited {
                    exact_terms.insert((field, token.clone()));
                }
            }
            let q: Box<dyn Query> = if per_field.len() == 1 {
                per_field.remove(0).1
            } else {
                Box::new(BooleanQuery::new(per_field))
            };
            if clause.presence != Presence::Prohibited {
                only_prohibited = false;
            }
            subqueries.push((clause.presence.occur(), q));
        }
    }

    if subqueries.is_empty() {
        return Ok(None);
    }
    // A purely negative query matches everything it does not exclude.
    if only_prohibited {
        subqueries.push((Occur::Should, Box::new(AllQuery)));
    }

    Ok(Some(QueryPlan {
        query: Box::new(BooleanQuery::new(subqueries)),
        exact_terms,
    }))
}

fn term_query(
    clause: &Clause,
    field: tantivy::schema::Field,
    token: &str,
) -> Result<Box<dyn Query>, SearchError> {
    let term = Term::from_field_text(field, token);
    let q: Box<dyn Query> = match (clause.prefix, clause.edit_distance) {
        (false, 0) => Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
        (true, 0) => {
            // Tokens are alphanumeric, so they never contain regex metacharacters.
            Box::new(RegexQuery::from_pattern(&format!("{token}.*"), field)?)
        }
        (false, d) => Box::new(FuzzyTermQuery::new(term, d, true)),
        (true, d) => Box::new(FuzzyTermQuery::new_prefix(term, d, true)),
    };
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(word: &str) -> Clause {
        let mut clauses = parse_query(word).unwrap();
        assert_eq!(clauses.len(), 1);
        clauses.remove(0)
    }

    #[test]
    fn test_plain_terms() {
        let clauses = parse_query("  data   visualization ").unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].text, "data");
        assert_eq!(clauses[0].presence, Presence::Optional);
        assert_eq!(clauses[0].field, None);
        assert_eq!(clauses[1].boost, 1.0);
    }

    #[test]
    fn test_presence_and_field() {
        let c = one("+title:basics");
        assert_eq!(c.presence, Presence::Required);
        assert_eq!(c.field, Some(SearchField::Title));
        assert_eq!(c.text, "basics");

        let c = one("-body:locales");
        assert_eq!(c.presence, Presence::Prohibited);
        assert_eq!(c.field, Some(SearchField::Body));
    }

    #[test]
    fn test_modifiers() {
        let c = one("visualise~1^3");
        assert_eq!(c.text, "visualise");
        assert_eq!(c.edit_distance, 1);
        assert_eq!(c.boost, 3.0);

        let c = one("tidy*");
        assert!(c.prefix);
        assert_eq!(c.text, "tidy");

        let c = one("repro*^2.5");
        assert!(c.prefix);
        assert_eq!(c.boost, 2.5);
    }

    #[test]
    fn test_invalid_clauses() {
        assert!(matches!(
            parse_query("author:knuth"),
            Err(SearchError::InvalidQuery(_))
        ));
        assert!(parse_query("git~3").is_err());
        assert!(parse_query("git~x").is_err());
        assert!(parse_query("git^0").is_err());
        assert!(parse_query("git^").is_err());
    }

    #[test]
    fn test_bare_operators_yield_empty_text() {
        let c = one("+");
        assert_eq!(c.text, "");
        let c = one(":basics");
        assert_eq!(c.field, None);
        assert_eq!(c.text, ":basics");
    }

    #[test]
    fn test_compile_tracks_exact_terms() {
        let schema = super::super::builder::build_schema(true);
        let fields = SearchFields::load(&schema).unwrap();
        let mut analyzer = analyzer::build_analyzer();
        let clauses = parse_query("Data.Table -locales tidy* title:git").unwrap();
        let plan = compile(&clauses, &fields, &IndexOptions::default(), &mut analyzer)
            .unwrap()
            .unwrap();
        let terms: Vec<(SearchField, &str)> = plan
            .exact_terms
            .iter()
            .map(|(f, t)| (*f, t.as_str()))
            .collect();
        assert_eq!(
            terms,
            [
                (SearchField::Title, "data"),
                (SearchField::Title, "git"),
                (SearchField::Title, "table"),
                (SearchField::Body, "data"),
                (SearchField::Body, "table"),
            ]
        );
    }

    #[test]
    fn test_compile_without_terms() {
        let schema = super::super::builder::build_schema(true);
        let fields = SearchFields::load(&schema).unwrap();
        let mut analyzer = analyzer::build_analyzer();
        let clauses = parse_query("... + -").unwrap();
        let plan = compile(&clauses, &fields, &IndexOptions::default(), &mut analyzer).unwrap();
        assert!(plan.is_none());
    }
}
