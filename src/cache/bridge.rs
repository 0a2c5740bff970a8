//! Soft cache layer between the service and a [`SearchCache`] backend
//!
//! Every method here degrades to "no cache": backend and serialization
//! failures are logged at warn level and turned into misses or no-ops. The
//! engine never surfaces a cache error to a caller.

use crate::cache::store::SearchCache;
use crate::config::SearchEngineConfig;
use crate::models::Document;
use crate::query::{SearchOptions, SearchResponse};
use base64ct::{Base64UrlUnpadded, Encoding};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// Key segment used when a request carries no tenant
const GLOBAL_SEGMENT: &str = "_";

/// Cache access for snapshots, query results, and suggestions.
///
/// Keys are `{prefix}:{kind}:{tenant}:{digest}` so a tenant's entries can be
/// purged with one glob.
#[derive(Clone)]
pub struct CacheBridge {
    backend: Arc<dyn SearchCache>,
    prefix: String,
    snapshot_ttl: Duration,
    query_ttl: Duration,
    suggestion_ttl: Duration,
}

impl CacheBridge {
    pub fn new(backend: Arc<dyn SearchCache>, config: &SearchEngineConfig) -> Self {
        Self {
            backend,
            prefix: config.cache_key_prefix.clone(),
            snapshot_ttl: Duration::from_secs(config.snapshot_ttl_secs),
            query_ttl: Duration::from_secs(config.query_cache_ttl_secs),
            suggestion_ttl: Duration::from_secs(config.suggestion_cache_ttl_secs),
        }
    }

    fn snapshot_key(&self) -> String {
        format!("{}:snapshot:index", self.prefix)
    }

    fn query_key(&self, tenant_id: Option<&str>, digest: &str) -> String {
        format!(
            "{}:query:{}:{}",
            self.prefix,
            tenant_id.unwrap_or(GLOBAL_SEGMENT),
            digest
        )
    }

    fn suggestion_key(&self, tenant_id: Option<&str>, digest: &str) -> String {
        format!(
            "{}:suggest:{}:{}",
            self.prefix,
            tenant_id.unwrap_or(GLOBAL_SEGMENT),
            digest
        )
    }

    /// Digest of everything that affects a result, so distinct requests never
    /// collide on a key.
    fn digest(parts: &[&str]) -> String {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        Base64UrlUnpadded::encode_string(hasher.finalize().as_slice())
    }

    /// Persist the full document set for warm restarts.
    pub async fn store_snapshot(&self, documents: &[Document]) {
        let payload = match serde_json::to_string(documents) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize index snapshot");
                return;
            }
        };

        if let Err(err) = self
            .backend
            .set(&self.snapshot_key(), &payload, self.snapshot_ttl)
            .await
        {
            tracing::warn!(error = %err, "Failed to store index snapshot");
        }
    }

    /// Load a previously stored snapshot, if one is still live.
    pub async fn load_snapshot(&self) -> Option<Vec<Document>> {
        let payload = match self.backend.get(&self.snapshot_key()).await {
            Ok(value) => value?,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read index snapshot");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(documents) => Some(documents),
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable index snapshot");
                None
            }
        }
    }

    pub async fn cached_query(
        &self,
        tenant_id: Option<&str>,
        query: &str,
        options: &SearchOptions,
    ) -> Option<SearchResponse> {
        let digest = self.query_digest(query, options)?;
        let key = self.query_key(tenant_id, &digest);

        let payload = match self.backend.get(&key).await {
            Ok(value) => value?,
            Err(err) => {
                tracing::warn!(error = %err, "Query cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(response) => {
                tracing::debug!(cache_key = %key, "Query cache hit");
                Some(response)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable cached query result");
                None
            }
        }
    }

    pub async fn cache_query(
        &self,
        tenant_id: Option<&str>,
        query: &str,
        options: &SearchOptions,
        response: &SearchResponse,
    ) {
        let Some(digest) = self.query_digest(query, options) else {
            return;
        };
        let payload = match serde_json::to_string(response) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize query result for caching");
                return;
            }
        };

        let key = self.query_key(tenant_id, &digest);
        if let Err(err) = self.backend.set(&key, &payload, self.query_ttl).await {
            tracing::warn!(error = %err, cache_key = %key, "Query cache write failed");
        }
    }

    pub async fn cached_suggestions(
        &self,
        tenant_id: Option<&str>,
        query: &str,
        limit: usize,
    ) -> Option<Vec<String>> {
        let key = self.suggestion_key(
            tenant_id,
            &Self::digest(&[query, &limit.to_string()]),
        );

        let payload = match self.backend.get(&key).await {
            Ok(value) => value?,
            Err(err) => {
                tracing::warn!(error = %err, "Suggestion cache read failed");
                return None;
            }
        };

        serde_json::from_str(&payload).ok()
    }

    pub async fn cache_suggestions(
        &self,
        tenant_id: Option<&str>,
        query: &str,
        limit: usize,
        suggestions: &[String],
    ) {
        let key = self.suggestion_key(
            tenant_id,
            &Self::digest(&[query, &limit.to_string()]),
        );
        let payload = match serde_json::to_string(suggestions) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to serialize suggestions for caching");
                return;
            }
        };

        if let Err(err) = self.backend.set(&key, &payload, self.suggestion_ttl).await {
            tracing::warn!(error = %err, cache_key = %key, "Suggestion cache write failed");
        }
    }

    /// Purge every cached entry belonging to one tenant.
    pub async fn invalidate_tenant(&self, tenant_id: &str) -> u64 {
        let pattern = format!("{}:*:{}:*", self.prefix, tenant_id);
        match self.backend.invalidate_pattern(&pattern).await {
            Ok(dropped) => {
                tracing::debug!(tenant_id = %tenant_id, dropped, "Tenant cache entries purged");
                dropped
            }
            Err(err) => {
                tracing::warn!(error = %err, tenant_id = %tenant_id, "Tenant cache purge failed");
                0
            }
        }
    }

    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }

    fn query_digest(&self, query: &str, options: &SearchOptions) -> Option<String> {
        match serde_json::to_string(options) {
            Ok(options_json) => Some(Self::digest(&[query, &options_json])),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to derive query cache key");
                None
            }
        }
    }
}
