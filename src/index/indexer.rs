//! Document indexing: searchable text, boost derivation, and the
//! retract-then-insert upsert over both index structures

use crate::config::SearchEngineConfig;
use crate::index::forward::ForwardIndex;
use crate::index::inverted::InvertedIndex;
use crate::models::{ContentStatus, Document, DocumentKind};
use chrono::{DateTime, Duration, Utc};

/// Concatenate every present textual field with single-space separators.
pub fn searchable_text(doc: &Document) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for field in [
        &doc.title,
        &doc.body,
        &doc.excerpt,
        &doc.filename,
        &doc.original_name,
        &doc.alt_text,
        &doc.caption,
        &doc.description,
    ] {
        if let Some(value) = field {
            if !value.is_empty() {
                parts.push(value);
            }
        }
    }
    parts.extend(doc.tags.iter().map(String::as_str));
    parts.extend(doc.categories.iter().map(String::as_str));

    parts.join(" ")
}

/// Derive the relevance weight for a document.
///
/// Base 1.0, multiplied by kind, publication status, and a recency tier.
/// The tiers are mutually exclusive and the most recent one wins.
pub fn calculate_boost(doc: &Document, now: DateTime<Utc>, config: &SearchEngineConfig) -> f64 {
    let mut boost = 1.0;

    if doc.kind == DocumentKind::Content {
        boost *= config.content_kind_weight;
    }

    if doc.status == Some(ContentStatus::Published) {
        boost *= config.published_weight;
    }

    let age = now.signed_duration_since(doc.created_at);
    if age < Duration::days(config.fresh_days) {
        boost *= config.fresh_weight;
    } else if age < Duration::days(config.recent_days) {
        boost *= config.recent_weight;
    }

    boost
}

/// The two index structures, mutated together under one lock.
///
/// Every mutation here is a single synchronous critical section per document
/// id: retract old postings, insert new postings, replace the forward record.
#[derive(Debug, Default)]
pub struct IndexInner {
    pub forward: ForwardIndex,
    pub inverted: InvertedIndex,
}

impl IndexInner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a document whose `searchable_text` and `boost` are already
    /// derived. If a prior version exists its postings are retracted using
    /// the *old* searchable text before the new ones are inserted, so no
    /// stale or duplicate postings survive an update. Idempotent.
    pub fn upsert(&mut self, doc: Document) {
        if let Some(previous) = self.forward.get(&doc.id) {
            let old_text = previous.searchable_text.clone();
            self.inverted.remove_postings(&doc.id, &old_text);
        }

        self.inverted.add_postings(&doc.id, &doc.searchable_text);
        tracing::debug!(document_id = %doc.id, tenant_id = %doc.tenant_id, "Document indexed");
        self.forward.insert(doc);
    }

    /// Remove a document and all of its postings. Removing an absent id is a
    /// no-op.
    pub fn remove(&mut self, doc_id: &str) -> Option<Document> {
        let doc = self.forward.remove(doc_id)?;
        self.inverted.remove_postings(doc_id, &doc.searchable_text);
        tracing::debug!(document_id = %doc_id, "Document removed from index");
        Some(doc)
    }

    /// Drop every document owned by `tenant_id`, returning how many were
    /// removed. Safe to re-run.
    pub fn remove_tenant(&mut self, tenant_id: &str) -> usize {
        let ids = self.forward.tenant_document_ids(tenant_id);
        for id in &ids {
            self.remove(id);
        }
        ids.len()
    }
}

/// Build a fully derived document from an ingest-side view.
pub fn finalize_document(mut doc: Document, config: &SearchEngineConfig) -> Document {
    doc.searchable_text = searchable_text(&doc);
    doc.boost = calculate_boost(&doc, Utc::now(), config);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentRecord;

    fn record(id: &str, title: &str, body: &str, status: ContentStatus) -> ContentRecord {
        ContentRecord {
            id: id.to_string(),
            tenant_id: "acme".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            excerpt: None,
            tags: vec!["finance".to_string()],
            categories: vec!["reports".to_string()],
            status,
            author_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn finalized(record: &ContentRecord) -> Document {
        finalize_document(Document::from(record), &SearchEngineConfig::default())
    }

    #[test]
    fn test_searchable_text_concatenation() {
        let doc = finalized(&record(
            "1",
            "Quarterly Report",
            "Revenue grew",
            ContentStatus::Published,
        ));
        assert_eq!(doc.searchable_text, "Quarterly Report Revenue grew finance reports");
    }

    #[test]
    fn test_boost_tiers() {
        let config = SearchEngineConfig::default();
        let now = Utc::now();

        let mut doc = finalized(&record("1", "T", "", ContentStatus::Published));
        // fresh published content: 1.2 * 1.5 * 1.3
        assert!((calculate_boost(&doc, now, &config) - 2.34).abs() < 1e-9);

        // older than 30 days: no recency multiplier
        doc.created_at = now - Duration::days(45);
        assert!((calculate_boost(&doc, now, &config) - 1.8).abs() < 1e-9);

        // 7-30 days old: second tier only
        doc.created_at = now - Duration::days(10);
        assert!((calculate_boost(&doc, now, &config) - 1.98).abs() < 1e-9);
    }

    #[test]
    fn test_published_outweighs_draft() {
        let config = SearchEngineConfig::default();
        let now = Utc::now();
        let published = finalized(&record("1", "T", "", ContentStatus::Published));
        let draft = finalized(&record("2", "T", "", ContentStatus::Draft));

        assert!(calculate_boost(&published, now, &config) > calculate_boost(&draft, now, &config));
    }

    #[test]
    fn test_upsert_retracts_old_postings() {
        let config = SearchEngineConfig::default();
        let mut inner = IndexInner::new();

        inner.upsert(finalized(&record(
            "1",
            "alpha vocabulary",
            "",
            ContentStatus::Draft,
        )));
        assert_eq!(inner.inverted.posting_len("alpha"), 1);

        inner.upsert(finalize_document(
            Document::from(&record("1", "omega wording", "", ContentStatus::Draft)),
            &config,
        ));

        assert_eq!(inner.inverted.posting_len("alpha"), 0);
        assert_eq!(inner.inverted.posting_len("omega"), 1);
        assert_eq!(inner.forward.len(), 1);
    }

    #[test]
    fn test_upsert_idempotent() {
        let mut inner = IndexInner::new();
        let doc = finalized(&record("1", "stable title", "", ContentStatus::Draft));

        inner.upsert(doc.clone());
        let vocab = inner.inverted.vocabulary_size();
        let postings = inner.inverted.posting_count();

        inner.upsert(doc);
        assert_eq!(inner.inverted.vocabulary_size(), vocab);
        assert_eq!(inner.inverted.posting_count(), postings);
        assert_eq!(inner.forward.len(), 1);
    }

    #[test]
    fn test_remove_tenant() {
        let mut inner = IndexInner::new();
        inner.upsert(finalized(&record("1", "one", "", ContentStatus::Draft)));
        inner.upsert(finalized(&record("2", "two", "", ContentStatus::Draft)));

        assert_eq!(inner.remove_tenant("acme"), 2);
        assert!(inner.forward.is_empty());
        assert_eq!(inner.inverted.vocabulary_size(), 0);
        // idempotent
        assert_eq!(inner.remove_tenant("acme"), 0);
    }
}
