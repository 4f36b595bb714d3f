//! Sled Persistence - 进程级缓存存储

mod cache_store;

pub use cache_store::{SledCacheConfig, SledCacheStore};
