//! Document-id → full document store

use crate::models::{Document, DocumentKind};
use std::collections::HashMap;

/// Forward index: the source of truth for scoring, highlighting, and
/// re-deriving postings on update or removal.
#[derive(Debug, Default)]
pub struct ForwardIndex {
    documents: HashMap<String, Document>,
}

impl ForwardIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `doc.id`, returning the previous one if any.
    pub fn insert(&mut self, doc: Document) -> Option<Document> {
        self.documents.insert(doc.id.clone(), doc)
    }

    pub fn remove(&mut self, doc_id: &str) -> Option<Document> {
        self.documents.remove(doc_id)
    }

    pub fn get(&self, doc_id: &str) -> Option<&Document> {
        self.documents.get(doc_id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn count_by_kind(&self, kind: DocumentKind) -> usize {
        self.documents.values().filter(|d| d.kind == kind).count()
    }

    /// Distinct tenants with at least one indexed document.
    pub fn tenant_count(&self) -> usize {
        let mut tenants: Vec<&str> = self
            .documents
            .values()
            .map(|d| d.tenant_id.as_str())
            .collect();
        tenants.sort_unstable();
        tenants.dedup();
        tenants.len()
    }

    /// Ids of every document owned by `tenant_id`, used by tenant reindexing.
    pub fn tenant_document_ids(&self, tenant_id: &str) -> Vec<String> {
        self.documents
            .values()
            .filter(|d| d.tenant_id == tenant_id)
            .map(|d| d.id.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentRecord;
    use crate::models::ContentStatus;
    use chrono::Utc;

    fn doc(id: &str, tenant: &str) -> Document {
        let record = ContentRecord {
            id: id.to_string(),
            tenant_id: tenant.to_string(),
            title: "Title".to_string(),
            body: String::new(),
            excerpt: None,
            tags: vec![],
            categories: vec![],
            status: ContentStatus::Draft,
            author_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        Document::from(&record)
    }

    #[test]
    fn test_insert_replaces() {
        let mut index = ForwardIndex::new();
        assert!(index.insert(doc("a", "t1")).is_none());
        assert!(index.insert(doc("a", "t1")).is_some());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_tenant_scan() {
        let mut index = ForwardIndex::new();
        index.insert(doc("a", "t1"));
        index.insert(doc("b", "t1"));
        index.insert(doc("c", "t2"));

        let ids = index.tenant_document_ids("t1");
        assert_eq!(ids.len(), 2);
        assert_eq!(index.tenant_count(), 2);
    }
}
