//! The search service facade
//!
//! Owns the index behind one `RwLock`, the analytics collector, and the cache
//! bridge. All public operations go through here; the index is only ever
//! mutated inside a single synchronous critical section per call.

use crate::analytics::{AnalyticsSnapshot, SearchAnalytics};
use crate::cache::{CacheBridge, MemoryCache, SearchCache};
use crate::config::SearchEngineConfig;
use crate::error::Result;
use crate::index::{finalize_document, tokenize, IndexInner};
use crate::models::{ContentRecord, Document, DocumentKind, MediaRecord};
use crate::query::{self, SearchOptions, SearchResponse};
use crate::suggest;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use strum_macros::Display;
use validator::Validate;

/// Suggestions returned when the caller gives no limit, and attached to
/// zero-hit search responses
const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// One entry in a bulk indexing request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndexRequest {
    Content(ContentRecord),
    Media(MediaRecord),
}

impl IndexRequest {
    fn entity_id(&self) -> &str {
        match self {
            IndexRequest::Content(record) => &record.id,
            IndexRequest::Media(record) => &record.id,
        }
    }
}

/// A single failed entry of a bulk indexing call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailure {
    /// Entity id of the rejected record
    pub id: String,

    /// Why the record was rejected
    pub reason: String,
}

/// Outcome of a bulk indexing call. One bad record never aborts the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkIndexOutcome {
    /// How many records were indexed
    pub indexed: usize,

    /// The records that were rejected, with reasons
    pub failed: Vec<BulkFailure>,
}

/// Index size counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub content_documents: usize,
    pub media_documents: usize,
    pub vocabulary_size: usize,
    pub posting_count: usize,
    pub tenant_count: usize,
}

/// Overall service health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Health report: the index always works, a dead cache backend only degrades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub index_size: usize,
    pub cache_connected: bool,
}

/// Embedded multi-tenant search service over content and media records
#[derive(Clone)]
pub struct SearchService {
    config: SearchEngineConfig,
    index: Arc<RwLock<IndexInner>>,
    analytics: Arc<SearchAnalytics>,
    cache: CacheBridge,
}

impl SearchService {
    /// Create a service backed by the in-process memory cache.
    pub fn new(config: SearchEngineConfig) -> Self {
        let backend: Arc<dyn SearchCache> = Arc::new(MemoryCache::default());
        Self::with_cache(config, backend)
    }

    /// Create a service with an explicit cache backend (e.g. Redis).
    pub fn with_cache(config: SearchEngineConfig, backend: Arc<dyn SearchCache>) -> Self {
        let cache = CacheBridge::new(backend, &config);
        tracing::info!("Search service initialized");
        Self {
            config,
            index: Arc::new(RwLock::new(IndexInner::new())),
            analytics: Arc::new(SearchAnalytics::new()),
            cache,
        }
    }

    pub fn config(&self) -> &SearchEngineConfig {
        &self.config
    }

    /// Rebuild the index from the cached snapshot, if one is still live.
    /// Returns how many documents were restored.
    pub async fn hydrate(&self) -> usize {
        let Some(documents) = self.cache.load_snapshot().await else {
            return 0;
        };

        let restored = documents.len();
        {
            let mut inner = self.index.write();
            for doc in documents {
                inner.upsert(doc);
            }
        }
        tracing::info!(restored, "Index hydrated from snapshot");
        restored
    }

    /// Persist the current index to the cache backend.
    pub async fn flush(&self) {
        let documents: Vec<Document> = {
            let inner = self.index.read();
            inner.forward.iter().cloned().collect()
        };
        self.cache.store_snapshot(&documents).await;
    }

    /// Index or re-index a content record.
    pub async fn index_content(&self, record: &ContentRecord) -> Result<()> {
        record.validate()?;
        let doc = finalize_document(Document::from(record), &self.config);
        self.apply_upsert(doc).await;
        Ok(())
    }

    /// Alias of [`index_content`](Self::index_content); indexing is an upsert.
    pub async fn update_content(&self, record: &ContentRecord) -> Result<()> {
        self.index_content(record).await
    }

    /// Remove a content record. Removing an unknown id is a no-op; returns
    /// whether a document was actually dropped.
    pub async fn remove_content(&self, entity_id: &str) -> bool {
        self.remove(DocumentKind::Content, entity_id).await
    }

    /// Index or re-index a media record.
    pub async fn index_media(&self, record: &MediaRecord) -> Result<()> {
        record.validate()?;
        let doc = finalize_document(Document::from(record), &self.config);
        self.apply_upsert(doc).await;
        Ok(())
    }

    /// Alias of [`index_media`](Self::index_media); indexing is an upsert.
    pub async fn update_media(&self, record: &MediaRecord) -> Result<()> {
        self.index_media(record).await
    }

    /// Remove a media record. Removing an unknown id is a no-op.
    pub async fn remove_media(&self, entity_id: &str) -> bool {
        self.remove(DocumentKind::Media, entity_id).await
    }

    async fn apply_upsert(&self, doc: Document) {
        let tenant = doc.tenant_id.clone();
        {
            let mut inner = self.index.write();
            inner.upsert(doc);
        }
        self.cache.invalidate_tenant(&tenant).await;
        self.flush().await;
    }

    async fn remove(&self, kind: DocumentKind, entity_id: &str) -> bool {
        let doc_id = Document::composite_id(kind, entity_id);
        let removed = {
            let mut inner = self.index.write();
            inner.remove(&doc_id)
        };

        match removed {
            Some(doc) => {
                self.cache.invalidate_tenant(&doc.tenant_id).await;
                self.flush().await;
                true
            }
            None => false,
        }
    }

    /// Execute a search query.
    ///
    /// Recently executed identical requests are served from the cache; cache
    /// hits still count toward analytics.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResponse> {
        options.validate(&self.config)?;
        let started = Instant::now();
        let tenant = options.tenant_id.as_deref();

        if tokenize(query).is_empty() {
            self.analytics.record_search(tenant, query, 0);
            return Ok(SearchResponse::empty(options.page, options.limit));
        }

        if let Some(cached) = self.cache.cached_query(tenant, query, options).await {
            self.analytics.record_search(tenant, query, cached.total);
            return Ok(cached);
        }

        let mut response = {
            let inner = self.index.read();
            query::execute(&inner, query, options, &self.config)
        };

        self.analytics.record_search(tenant, query, response.total);
        self.analytics
            .record_impressions(response.hits.iter().map(|h| h.document.id.as_str()));

        if response.total == 0 {
            let suggestions = self.rank_suggestions(query, tenant, DEFAULT_SUGGESTION_LIMIT);
            if !suggestions.is_empty() {
                response.suggestions = Some(suggestions);
            }
        }

        response.search_time_ms = started.elapsed().as_millis() as u64;
        self.cache.cache_query(tenant, query, options, &response).await;

        tracing::debug!(
            query = %query,
            total = response.total,
            search_time_ms = response.search_time_ms,
            "Search executed"
        );
        Ok(response)
    }

    /// Suggest completions for a partial query.
    pub async fn get_suggestions(
        &self,
        query: &str,
        tenant_id: Option<&str>,
        limit: usize,
    ) -> Vec<String> {
        let limit = if limit == 0 {
            DEFAULT_SUGGESTION_LIMIT
        } else {
            limit
        };

        if let Some(cached) = self.cache.cached_suggestions(tenant_id, query, limit).await {
            return cached;
        }

        let suggestions = self.rank_suggestions(query, tenant_id, limit);
        self.cache
            .cache_suggestions(tenant_id, query, limit, &suggestions)
            .await;
        suggestions
    }

    fn rank_suggestions(&self, query: &str, tenant_id: Option<&str>, limit: usize) -> Vec<String> {
        let history = self.analytics.query_history(tenant_id);
        let inner = self.index.read();
        suggest::suggest(&inner.forward, &history, query, tenant_id, limit)
    }

    /// Analytics for one tenant, or the global scope when `tenant_id` is
    /// `None`. Popular content is restricted to documents the scope owns.
    pub fn get_search_analytics(&self, tenant_id: Option<&str>) -> AnalyticsSnapshot {
        let inner = self.index.read();
        self.analytics
            .snapshot(tenant_id, self.config.analytics_top_n, |doc_id| {
                match tenant_id {
                    Some(tenant) => inner
                        .forward
                        .get(doc_id)
                        .is_some_and(|doc| doc.tenant_id == tenant),
                    None => true,
                }
            })
    }

    /// Drop every document a tenant owns and purge its cache entries.
    /// Callers re-populate with [`bulk_index`](Self::bulk_index). Returns how
    /// many documents were dropped.
    pub async fn reindex_tenant(&self, tenant_id: &str) -> usize {
        let removed = {
            let mut inner = self.index.write();
            inner.remove_tenant(tenant_id)
        };

        self.cache.invalidate_tenant(tenant_id).await;
        self.flush().await;

        tracing::info!(tenant_id = %tenant_id, removed, "Tenant reindex started");
        removed
    }

    /// Index a batch of records. Invalid records are reported per entry and
    /// never abort the rest of the batch.
    pub async fn bulk_index(&self, requests: Vec<IndexRequest>) -> BulkIndexOutcome {
        let mut indexed = 0;
        let mut failed = Vec::new();
        let mut tenants: Vec<String> = Vec::new();

        {
            let mut inner = self.index.write();
            for request in &requests {
                let validation = match request {
                    IndexRequest::Content(record) => record.validate(),
                    IndexRequest::Media(record) => record.validate(),
                };
                if let Err(err) = validation {
                    failed.push(BulkFailure {
                        id: request.entity_id().to_string(),
                        reason: err.to_string(),
                    });
                    continue;
                }

                let doc = match request {
                    IndexRequest::Content(record) => Document::from(record),
                    IndexRequest::Media(record) => Document::from(record),
                };
                let doc = finalize_document(doc, &self.config);
                tenants.push(doc.tenant_id.clone());
                inner.upsert(doc);
                indexed += 1;
            }
        }

        tenants.sort_unstable();
        tenants.dedup();
        for tenant in &tenants {
            self.cache.invalidate_tenant(tenant).await;
        }
        if indexed > 0 {
            self.flush().await;
        }

        tracing::info!(indexed, failed = failed.len(), "Bulk indexing finished");
        BulkIndexOutcome { indexed, failed }
    }

    /// Shrink internal index storage after heavy churn.
    pub fn optimize_index(&self) -> IndexStats {
        {
            let mut inner = self.index.write();
            inner.inverted.compact();
        }
        tracing::info!("Index optimized");
        self.get_index_stats()
    }

    /// Current index size counters.
    pub fn get_index_stats(&self) -> IndexStats {
        let inner = self.index.read();
        IndexStats {
            total_documents: inner.forward.len(),
            content_documents: inner.forward.count_by_kind(DocumentKind::Content),
            media_documents: inner.forward.count_by_kind(DocumentKind::Media),
            vocabulary_size: inner.inverted.vocabulary_size(),
            posting_count: inner.inverted.posting_count(),
            tenant_count: inner.forward.tenant_count(),
        }
    }

    /// Service health. Search keeps working without the cache backend, so a
    /// failed backend probe reports `degraded` rather than an error.
    pub async fn health_check(&self) -> HealthStatus {
        let index_size = {
            let inner = self.index.read();
            inner.forward.len()
        };
        let cache_connected = self.cache.health_check().await;

        HealthStatus {
            status: if cache_connected {
                HealthState::Healthy
            } else {
                HealthState::Degraded
            },
            index_size,
            cache_connected,
        }
    }
}
