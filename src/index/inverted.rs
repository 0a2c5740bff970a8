//! Token → document-id postings, incrementally maintained

use crate::index::tokenizer::tokenize;
use std::collections::{HashMap, HashSet};

/// Inverted index mapping normalized tokens to the set of documents that
/// contain them.
///
/// Invariant: a token with an empty posting set is removed from the map so
/// vocabulary growth is bounded by live documents.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, HashSet<String>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize `text` and record `doc_id` under each resulting token.
    pub fn add_postings(&mut self, doc_id: &str, text: &str) {
        for token in tokenize(text) {
            self.postings
                .entry(token)
                .or_default()
                .insert(doc_id.to_string());
        }
    }

    /// Remove `doc_id` from every token of `text`.
    ///
    /// Callers must pass the same text that was supplied at insertion time;
    /// the indexer keeps the old `searchable_text` on the forward record for
    /// exactly this purpose.
    pub fn remove_postings(&mut self, doc_id: &str, text: &str) {
        for token in tokenize(text) {
            if let Some(ids) = self.postings.get_mut(&token) {
                ids.remove(doc_id);
                if ids.is_empty() {
                    self.postings.remove(&token);
                }
            }
        }
    }

    /// Documents containing `token`, if any.
    pub fn postings_of(&self, token: &str) -> Option<&HashSet<String>> {
        self.postings.get(token)
    }

    /// Number of documents containing `token`.
    pub fn posting_len(&self, token: &str) -> usize {
        self.postings.get(token).map_or(0, HashSet::len)
    }

    /// All indexed tokens. Fuzzy matching scans this linearly.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Distinct token count.
    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    /// Total (token, document) pairs.
    pub fn posting_count(&self) -> usize {
        self.postings.values().map(HashSet::len).sum()
    }

    /// Drop empty posting sets and release excess capacity after heavy churn.
    pub fn compact(&mut self) {
        self.postings.retain(|_, ids| !ids.is_empty());
        self.postings.shrink_to_fit();
        for ids in self.postings.values_mut() {
            ids.shrink_to_fit();
        }
    }

    pub fn clear(&mut self) {
        self.postings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut index = InvertedIndex::new();
        index.add_postings("content:1", "quarterly financial report");

        let ids = index.postings_of("quarterly").unwrap();
        assert!(ids.contains("content:1"));
        assert_eq!(index.posting_len("report"), 1);
        assert_eq!(index.posting_len("missing"), 0);
    }

    #[test]
    fn test_remove_deletes_empty_entries() {
        let mut index = InvertedIndex::new();
        index.add_postings("content:1", "quarterly report");
        index.add_postings("content:2", "quarterly notes");

        index.remove_postings("content:1", "quarterly report");

        // "report" had only one posting and must be gone entirely
        assert!(index.postings_of("report").is_none());
        // "quarterly" still has content:2
        assert_eq!(index.posting_len("quarterly"), 1);
    }

    #[test]
    fn test_vocabulary_size() {
        let mut index = InvertedIndex::new();
        index.add_postings("media:1", "sunset beach photo");
        assert_eq!(index.vocabulary_size(), 3);
        assert_eq!(index.posting_count(), 3);
    }

    #[test]
    fn test_compact_preserves_postings() {
        let mut index = InvertedIndex::new();
        index.add_postings("content:1", "alpha beta");
        index.compact();
        assert_eq!(index.posting_len("alpha"), 1);
    }
}
