//! Cache Module
//!
//! In-memory operator cache with TTL expiration, oldest-insertion-first
//! eviction, pattern invalidation and near-expiry renewal.

mod entry;
mod eviction;
pub mod keys;
mod shared;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::CacheEntry;
pub use eviction::eviction_count;
pub use shared::OperatorCache;
pub use stats::CacheStats;
pub use store::{CacheStore, Renewal};
pub use value::{CacheValue, Cacheable};
