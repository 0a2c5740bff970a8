//! Query execution pipeline: candidate retrieval, filtering, scoring,
//! sorting, pagination, and highlighting

use crate::config::SearchEngineConfig;
use crate::index::{tokenize, within_distance, IndexInner};
use crate::models::Document;
use crate::query::highlight::highlight_document;
use crate::query::options::{SearchFilter, SearchOptions, SearchSort, SortField, SortOrder};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// A single search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched document
    pub document: Document,

    /// Relevance score
    pub score: f64,

    /// Highlighted snippets per field (if highlighting was requested)
    pub highlights: HashMap<String, Vec<String>>,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn compute(total: usize, page: usize, limit: usize) -> Self {
        let total_pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total > 0,
        }
    }
}

/// Search response with results and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Results for the requested page
    pub hits: Vec<SearchHit>,

    /// Total matches before pagination
    pub total: usize,

    /// Pagination metadata
    pub pagination: Pagination,

    /// Search execution time in milliseconds
    pub search_time_ms: u64,

    /// Alternative queries, populated for zero-hit searches
    pub suggestions: Option<Vec<String>>,
}

impl SearchResponse {
    pub fn empty(page: usize, limit: usize) -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            pagination: Pagination::compute(0, page, limit),
            search_time_ms: 0,
            suggestions: None,
        }
    }
}

/// Execute a query against the index. Read-only; the caller holds the read
/// lock for the duration of the call.
pub(crate) fn execute(
    inner: &IndexInner,
    query: &str,
    options: &SearchOptions,
    config: &SearchEngineConfig,
) -> SearchResponse {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return SearchResponse::empty(options.page, options.limit);
    }

    let candidates = collect_candidates(inner, &tokens, options.fuzzy, config);

    let query_lower = query.to_lowercase();
    let mut scored: Vec<(&Document, f64)> = candidates
        .iter()
        .filter_map(|doc_id| inner.forward.get(doc_id))
        .filter(|doc| passes_filters(doc, options))
        .map(|doc| (doc, score_document(doc, &tokens, &query_lower, inner, config)))
        .collect();

    sort_results(&mut scored, options.sort);

    let total = scored.len();
    let pagination = Pagination::compute(total, options.page, options.limit);
    // page is validated to be >= 1 but otherwise unbounded
    let start = (options.page - 1).saturating_mul(options.limit);

    let hits: Vec<SearchHit> = scored
        .into_iter()
        .skip(start)
        .take(options.limit)
        .map(|(doc, score)| SearchHit {
            highlights: if options.highlight {
                highlight_document(
                    doc,
                    &tokens,
                    config.highlight_window,
                    config.max_snippets_per_field,
                )
            } else {
                HashMap::new()
            },
            document: doc.clone(),
            score,
        })
        .collect();

    SearchResponse {
        hits,
        total,
        pagination,
        search_time_ms: 0,
        suggestions: None,
    }
}

/// Union of postings for every query token; with fuzzy matching, also the
/// postings of every vocabulary token within the configured edit distance.
/// The fuzzy path is a linear scan over the vocabulary.
fn collect_candidates(
    inner: &IndexInner,
    tokens: &[String],
    fuzzy: bool,
    config: &SearchEngineConfig,
) -> HashSet<String> {
    let mut candidates: HashSet<String> = HashSet::new();

    for token in tokens {
        if let Some(ids) = inner.inverted.postings_of(token) {
            candidates.extend(ids.iter().cloned());
        }
    }

    if fuzzy {
        for vocab_token in inner.inverted.vocabulary() {
            if tokens
                .iter()
                .any(|t| within_distance(t, vocab_token, config.fuzzy_max_distance))
            {
                if let Some(ids) = inner.inverted.postings_of(vocab_token) {
                    candidates.extend(ids.iter().cloned());
                }
            }
        }
    }

    candidates
}

fn passes_filters(doc: &Document, options: &SearchOptions) -> bool {
    if let Some(tenant) = &options.tenant_id {
        if doc.tenant_id != *tenant {
            return false;
        }
    }

    if !options.scope.matches(doc.kind) {
        return false;
    }

    options.filters.iter().all(|filter| match filter {
        SearchFilter::Status(status) => doc.status == Some(*status),
        SearchFilter::MediaType(media_type) => doc.media_type.as_deref() == Some(media_type),
        SearchFilter::Author(author) => doc.owner_id.as_deref() == Some(author),
        SearchFilter::Tags(tags) => tags.iter().any(|t| doc.tags.contains(t)),
        SearchFilter::Categories(categories) => {
            categories.iter().any(|c| doc.categories.contains(c))
        }
        SearchFilter::CreatedBetween { after, before } => {
            after.is_none_or(|a| doc.created_at >= a)
                && before.is_none_or(|b| doc.created_at <= b)
        }
    })
}

/// TF-IDF score over the query tokens, then the title/tag substring
/// multipliers, then the stored document boost.
///
/// The IDF term is smoothed (`ln(1 + N/df)` rather than `ln(N/df)`): a token
/// present in every document would otherwise zero the base score and leave
/// ordering to the id tie-break instead of the status/recency boosts.
fn score_document(
    doc: &Document,
    tokens: &[String],
    query_lower: &str,
    inner: &IndexInner,
    config: &SearchEngineConfig,
) -> f64 {
    let doc_tokens = tokenize(&doc.searchable_text);
    let total_tokens = doc_tokens.len();
    let total_docs = inner.forward.len();

    let mut score = 0.0;
    if total_tokens > 0 && total_docs > 0 {
        for token in tokens {
            let occurrences = doc_tokens.iter().filter(|t| *t == token).count();
            let posting_len = inner.inverted.posting_len(token);
            if occurrences == 0 || posting_len == 0 {
                continue;
            }
            let tf = occurrences as f64 / total_tokens as f64;
            // smoothed so a token present in every document still scores
            let idf = (1.0 + total_docs as f64 / posting_len as f64).ln();
            score += tf * idf;
        }
    }

    if doc
        .title
        .as_ref()
        .is_some_and(|t| t.to_lowercase().contains(query_lower))
    {
        score *= config.title_match_boost;
    }

    if doc
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(query_lower))
    {
        score *= config.tag_match_boost;
    }

    score * doc.boost
}

/// Descending score, or the requested field order. Ties always resolve by
/// ascending document id so results never depend on map iteration order.
fn sort_results(scored: &mut [(&Document, f64)], sort: SearchSort) {
    match sort {
        SearchSort::Relevance => {
            scored.sort_by(|(a, sa), (b, sb)| {
                sb.partial_cmp(sa)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        SearchSort::Field { field, order } => {
            scored.sort_by(|(a, _), (b, _)| {
                let by_field = match field {
                    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                    SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                    SortField::Title => a
                        .title
                        .as_deref()
                        .unwrap_or_default()
                        .to_lowercase()
                        .cmp(&b.title.as_deref().unwrap_or_default().to_lowercase()),
                };
                let directed = match order {
                    SortOrder::Ascending => by_field,
                    SortOrder::Descending => by_field.reverse(),
                };
                directed.then_with(|| a.id.cmp(&b.id))
            });
        }
    }
}
