//! Query suggestion ranking
//!
//! Candidates come from two pools: historical queries that were issued more
//! than once, and textual document fields (titles, filenames, tags,
//! categories) of the requesting tenant. Each candidate is scored against the
//! partial query and the top `limit` are returned.

use crate::analytics::QueryCount;
use crate::index::{tokenize, ForwardIndex};
use std::collections::HashMap;

/// Base score for an exact match
const EXACT_SCORE: i64 = 100;
/// Base score for a prefix match
const PREFIX_SCORE: i64 = 50;
/// Base score for a substring match
const CONTAINS_SCORE: i64 = 25;
/// Shorter suggestions earn up to this many extra points
const LENGTH_BONUS_CEIL: i64 = 50;
/// Points per historical occurrence of the suggestion as a query
const POPULARITY_WEIGHT: i64 = 5;

/// A ranked suggestion candidate
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    text: String,
    score: i64,
}

/// Rank suggestions for a partial query.
///
/// History entries count toward candidacy only when seen more than once, so a
/// single typo never becomes a suggestion. Document-derived candidates are
/// restricted to `tenant_id` when given.
pub(crate) fn suggest(
    forward: &ForwardIndex,
    history: &[QueryCount],
    query: &str,
    tenant_id: Option<&str>,
    limit: usize,
) -> Vec<String> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() || limit == 0 {
        return Vec::new();
    }
    let query_tokens = tokenize(&normalized);

    // candidate text -> historical query count
    let mut popularity: HashMap<String, u64> = HashMap::new();
    let mut candidates: Vec<String> = Vec::new();

    for entry in history {
        if entry.count > 1 && entry.query.contains(&normalized) {
            popularity.insert(entry.query.clone(), entry.count);
            candidates.push(entry.query.clone());
        }
    }

    for doc in forward.iter() {
        if tenant_id.is_some_and(|tenant| doc.tenant_id != tenant) {
            continue;
        }
        let fields = doc
            .title
            .iter()
            .chain(doc.filename.iter())
            .chain(doc.tags.iter())
            .chain(doc.categories.iter());
        for field in fields {
            let text = field.trim().to_lowercase();
            if text.is_empty() {
                continue;
            }
            if matches(&text, &normalized, &query_tokens) {
                candidates.push(text);
            }
        }
    }

    candidates.sort_unstable();
    candidates.dedup();

    let mut ranked: Vec<Candidate> = candidates
        .into_iter()
        .map(|text| {
            let count = popularity.get(&text).copied().unwrap_or(0);
            let score = score(&text, &normalized, count);
            Candidate { text, score }
        })
        .collect();

    // already alphabetical from the dedup sort, so equal scores stay ordered
    ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.text.cmp(&b.text)));
    ranked.truncate(limit);
    ranked.into_iter().map(|c| c.text).collect()
}

/// A candidate matches when it contains the query verbatim or shares a token.
fn matches(candidate: &str, query: &str, query_tokens: &[String]) -> bool {
    if candidate.contains(query) {
        return true;
    }
    if query_tokens.is_empty() {
        return false;
    }
    let candidate_tokens = tokenize(candidate);
    query_tokens
        .iter()
        .any(|token| candidate_tokens.contains(token))
}

fn score(candidate: &str, query: &str, popularity: u64) -> i64 {
    let base = if candidate == query {
        EXACT_SCORE
    } else if candidate.starts_with(query) {
        PREFIX_SCORE
    } else if candidate.contains(query) {
        CONTAINS_SCORE
    } else {
        0
    };
    let length_bonus = (LENGTH_BONUS_CEIL - candidate.chars().count() as i64).max(0);
    base + length_bonus + popularity as i64 * POPULARITY_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexInner;
    use crate::models::{ContentRecord, ContentStatus, Document};
    use chrono::Utc;

    fn indexed(titles_and_tags: &[(&str, &[&str])]) -> IndexInner {
        let mut inner = IndexInner::new();
        for (i, (title, tags)) in titles_and_tags.iter().enumerate() {
            let record = ContentRecord {
                id: format!("doc-{i}"),
                tenant_id: "acme".to_string(),
                title: title.to_string(),
                body: String::new(),
                excerpt: None,
                tags: tags.iter().map(|t| t.to_string()).collect(),
                categories: vec![],
                status: ContentStatus::Published,
                author_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            let mut doc = Document::from(&record);
            doc.searchable_text = title.to_lowercase();
            inner.upsert(doc);
        }
        inner
    }

    fn history(entries: &[(&str, u64)]) -> Vec<QueryCount> {
        entries
            .iter()
            .map(|(q, c)| QueryCount {
                query: q.to_string(),
                count: *c,
            })
            .collect()
    }

    #[test]
    fn test_popular_history_outranks_rare() {
        let inner = indexed(&[]);
        let history = history(&[("dashboard", 3), ("dash", 2), ("dashed hopes", 1)]);

        let suggestions = suggest(&inner.forward, &history, "das", Some("acme"), 5);
        // "dash": prefix 50 + length 46 + popularity 10 = 106
        // "dashboard": prefix 50 + length 41 + popularity 15 = 106 -> tie,
        // alphabetical puts "dash" first; single-occurrence query is excluded
        assert_eq!(suggestions, vec!["dash", "dashboard"]);
    }

    #[test]
    fn test_exact_match_scores_highest() {
        let inner = indexed(&[("Report", &[]), ("Reporting Guide", &[])]);
        let suggestions = suggest(&inner.forward, &[], "report", Some("acme"), 5);
        assert_eq!(suggestions[0], "report");
    }

    #[test]
    fn test_document_fields_feed_candidates() {
        let inner = indexed(&[("Quarterly Report", &["finance"])]);

        let by_tag = suggest(&inner.forward, &[], "fin", Some("acme"), 5);
        assert_eq!(by_tag, vec!["finance"]);

        // token overlap matches even without a substring hit
        let by_token = suggest(&inner.forward, &[], "report", Some("acme"), 5);
        assert!(by_token.contains(&"quarterly report".to_string()));
    }

    #[test]
    fn test_tenant_filter() {
        let inner = indexed(&[("Quarterly Report", &[])]);
        let suggestions = suggest(&inner.forward, &[], "quarterly", Some("globex"), 5);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let inner = indexed(&[("Anything", &[])]);
        assert!(suggest(&inner.forward, &[], "   ", Some("acme"), 5).is_empty());
    }

    #[test]
    fn test_limit_respected() {
        let inner = indexed(&[("alpha one", &[]), ("alpha two", &[]), ("alpha three", &[])]);
        let suggestions = suggest(&inner.forward, &[], "alpha", Some("acme"), 2);
        assert_eq!(suggestions.len(), 2);
    }
}
