//! Embedded multi-tenant full-text search for CMS content and media.
//!
//! The crate keeps an inverted index and a forward document store in memory,
//! scores matches with TF-IDF plus document boosts, and optionally persists
//! index snapshots and query results to a pluggable cache backend (in-process
//! or Redis). Cache failures never fail a request.
//!
//! ```no_run
//! use cms_search_engine::{SearchEngineConfig, SearchOptions, SearchService};
//!
//! # async fn example(record: cms_search_engine::ContentRecord) {
//! let service = SearchService::new(SearchEngineConfig::default());
//! service.index_content(&record).await.unwrap();
//!
//! let results = service
//!     .search("quarterly report", &SearchOptions::new().with_tenant("acme"))
//!     .await
//!     .unwrap();
//! println!("{} matches", results.total);
//! # }
//! ```

pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod query;
pub mod service;
mod suggest;

pub use analytics::{AnalyticsSnapshot, PopularContent, QueryCount, SearchAnalytics, TrendBucket};
pub use cache::{CacheBridge, CacheError, CacheResult, MemoryCache, RedisCache, SearchCache};
pub use config::{SearchEngineConfig, SearchEngineConfigBuilder};
pub use error::{Result, SearchError};
pub use models::{ContentRecord, ContentStatus, Document, DocumentKind, MediaRecord};
pub use query::{
    Pagination, SearchFilter, SearchHit, SearchOptions, SearchResponse, SearchScope, SearchSort,
    SortField, SortOrder,
};
pub use service::{
    BulkFailure, BulkIndexOutcome, HealthState, HealthStatus, IndexRequest, IndexStats,
    SearchService,
};
