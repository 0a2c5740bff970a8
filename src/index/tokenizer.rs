//! Text normalization and tokenization

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Minimum token length retained by the tokenizer
const MIN_TOKEN_LEN: usize = 3;

/// Common English stopwords excluded from the index
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "with", "this", "that", "they", "have", "had",
        "what", "when", "where", "which", "who", "why", "how", "from", "was", "were", "will",
        "would", "there", "their", "been", "being", "into", "onto", "over", "under", "then",
        "than", "them", "these", "those", "some", "such", "its",
    ]
    .into_iter()
    .collect()
});

/// Tokenize text into normalized index terms.
///
/// Lowercases, maps non-word characters to whitespace, splits, and drops
/// tokens shorter than three characters or in the stopword set. Pure and
/// deterministic.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| token.len() >= MIN_TOKEN_LEN && !STOPWORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_split() {
        let tokens = tokenize("Database Connection ERROR");
        assert_eq!(tokens, vec!["database", "connection", "error"]);
    }

    #[test]
    fn test_strips_punctuation() {
        let tokens = tokenize("re-index: the (quarterly) report!");
        assert_eq!(tokens, vec!["index", "quarterly", "report"]);
    }

    #[test]
    fn test_drops_short_tokens_and_stopwords() {
        let tokens = tokenize("it is the cat on a mat with them");
        assert_eq!(tokens, vec!["cat", "mat"]);
    }

    #[test]
    fn test_deterministic() {
        let input = "Indexing content records, 2024 edition";
        assert_eq!(tokenize(input), tokenize(input));
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ...   ").is_empty());
    }
}
