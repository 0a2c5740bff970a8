//! Caching: backend seam, in-memory and Redis backends, and the soft bridge
//! the service talks to

mod bridge;
mod memory;
mod redis_store;
mod store;

pub use bridge::CacheBridge;
pub use memory::MemoryCache;
pub use redis_store::RedisCache;
pub use store::{CacheError, CacheResult, SearchCache};
