//! In-process cache backend using Moka
//!
//! The default backend when no Redis is configured. Per-entry TTLs are
//! implemented with Moka's `Expiry` hook, pattern invalidation with
//! invalidation closures.

use crate::cache::store::{CacheError, CacheResult, SearchCache};
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use regex::Regex;
use std::time::{Duration, Instant};

/// A cached payload together with the lifetime requested for it
#[derive(Clone)]
struct CachedValue {
    payload: String,
    ttl: Duration,
}

struct PerEntryExpiry;

impl Expiry<String, CachedValue> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Memory-backed cache with per-entry expiry and glob invalidation
#[derive(Clone)]
pub struct MemoryCache {
    cache: Cache<String, CachedValue>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .support_invalidation_closures()
            .build();

        Self { cache }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

/// Compile a `*`/`?` glob into an anchored regex.
fn glob_to_regex(pattern: &str) -> CacheResult<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 2);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| CacheError::Backend(format!("Invalid pattern: {}", e)))
}

#[async_trait]
impl SearchCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|v| v.payload))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.cache
            .insert(
                key.to_string(),
                CachedValue {
                    payload: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn invalidate_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let regex = glob_to_regex(pattern)?;
        let matched: u64 = self
            .cache
            .iter()
            .filter(|(key, _)| regex.is_match(key))
            .count() as u64;

        self.cache
            .invalidate_entries_if(move |key, _| regex.is_match(key))
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        Ok(matched)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = MemoryCache::default();
        cache
            .set("cms-search:query:acme:abc", "payload", Duration::from_secs(60))
            .await
            .unwrap();

        let value = cache.get("cms-search:query:acme:abc").await.unwrap();
        assert_eq!(value.as_deref(), Some("payload"));
        assert!(cache.get("cms-search:query:acme:zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_per_entry_ttl() {
        let cache = MemoryCache::default();
        cache
            .set("short", "v", Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set("long", "v", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get("short").await.unwrap().is_none());
        assert!(cache.get("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pattern_invalidation() {
        let cache = MemoryCache::default();
        let ttl = Duration::from_secs(60);
        cache.set("cms-search:query:acme:1", "a", ttl).await.unwrap();
        cache.set("cms-search:query:acme:2", "b", ttl).await.unwrap();
        cache.set("cms-search:query:globex:1", "c", ttl).await.unwrap();

        let dropped = cache
            .invalidate_pattern("cms-search:query:acme:*")
            .await
            .unwrap();
        assert_eq!(dropped, 2);

        assert!(cache.get("cms-search:query:acme:1").await.unwrap().is_none());
        assert!(cache.get("cms-search:query:globex:1").await.unwrap().is_some());
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let regex = glob_to_regex("a.b:*").unwrap();
        assert!(regex.is_match("a.b:anything"));
        assert!(!regex.is_match("aXb:anything"));
    }
}
