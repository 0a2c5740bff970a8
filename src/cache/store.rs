//! Cache backend seam
//!
//! The engine keeps working when the backend misbehaves, so cache errors have
//! their own type and are never converted into [`crate::error::SearchError`].
//! The bridge logs them and moves on.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a cache backend
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Pluggable cache backend.
///
/// Values are opaque strings (the bridge handles JSON); keys are
/// colon-separated and a pattern uses `*`/`?` globs against whole keys.
#[async_trait]
pub trait SearchCache: Send + Sync {
    /// Fetch a value, `None` on miss or expiry.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store a value with a per-entry time-to-live.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Remove every key matching a glob pattern, returning how many were
    /// dropped.
    async fn invalidate_pattern(&self, pattern: &str) -> CacheResult<u64>;

    /// Whether the backend currently answers requests.
    async fn health_check(&self) -> bool;
}
