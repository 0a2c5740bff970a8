//! Redis cache backend
//!
//! Uses a multiplexed `ConnectionManager` so the handle is cheap to clone and
//! reconnects on its own. Pattern invalidation walks the keyspace with SCAN
//! rather than KEYS to stay polite on shared instances.

use crate::cache::store::{CacheResult, SearchCache};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

/// SCAN batch size
const SCAN_COUNT: usize = 100;

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with a PING.
    pub async fn new(redis_url: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        let mut test_conn = connection.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut test_conn)
            .await?;

        tracing::info!("Connected Redis cache backend");

        Ok(Self { connection })
    }
}

#[async_trait]
impl SearchCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs().max(1)).await?;
        Ok(())
    }

    async fn invalidate_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut conn = self.connection.clone();
        let mut cursor: u64 = 0;
        let mut dropped: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await?;
                dropped += removed;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(dropped)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_cache() -> Option<RedisCache> {
        RedisCache::new("redis://127.0.0.1:6379/15").await.ok()
    }

    #[tokio::test]
    async fn test_set_get_and_pattern_delete() {
        let Some(cache) = create_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let ttl = Duration::from_secs(60);
        cache.set("cms-test:query:acme:1", "a", ttl).await.unwrap();
        cache.set("cms-test:query:acme:2", "b", ttl).await.unwrap();
        cache.set("cms-test:query:globex:1", "c", ttl).await.unwrap();

        assert_eq!(
            cache.get("cms-test:query:acme:1").await.unwrap().as_deref(),
            Some("a")
        );

        let dropped = cache.invalidate_pattern("cms-test:query:acme:*").await.unwrap();
        assert_eq!(dropped, 2);
        assert!(cache.get("cms-test:query:acme:1").await.unwrap().is_none());

        // Cleanup
        cache.invalidate_pattern("cms-test:*").await.ok();
    }

    #[tokio::test]
    async fn test_health_check() {
        let Some(cache) = create_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };
        assert!(cache.health_check().await);
    }
}
