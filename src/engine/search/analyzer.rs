//! Term extraction shared by indexing and querying.

use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, TextAnalyzer, TokenStream};
use tantivy::Index;

/// Name the analyzer is registered under in every index we build.
pub const ANALYZER_NAME: &str = "docindex";

/// Lowercase, split on non-alphanumeric characters, drop empty tokens.
pub fn build_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .build()
}

pub(crate) fn register(index: &Index) {
    index.tokenizers().register(ANALYZER_NAME, build_analyzer());
}

/// Run `text` through `analyzer`, collecting the token texts in order.
pub(crate) fn terms(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut out = Vec::new();
    while stream.advance() {
        let token = stream.token();
        if !token.text.is_empty() {
            out.push(token.text.clone());
        }
    }
    out
}

/// Terms of `text` as the index sees them.
pub fn tokenize(text: &str) -> Vec<String> {
    terms(&mut build_analyzer(), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_split() {
        assert_eq!(tokenize("Getting started"), ["getting", "started"]);
        assert_eq!(tokenize("data.table"), ["data", "table"]);
        assert_eq!(tokenize("Git and GitHub"), ["git", "and", "github"]);
    }

    #[test]
    fn test_punctuation_only() {
        assert!(tokenize("  --- ... !! ").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_digits_are_alphanumeric() {
        assert_eq!(tokenize("ggplot2, R4DS"), ["ggplot2", "r4ds"]);
    }
}
