//! Operator Cache - in-process read cache for the operator directory
//!
//! Bounded TTL cache with oldest-insertion-first eviction, pattern
//! invalidation, scheduled preload and janitor sweeps.

pub mod api;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod source;
pub mod tasks;

pub use api::AppState;
pub use cache::OperatorCache;
pub use config::Config;
pub use directory::OperatorDirectory;
pub use error::{CacheError, Result};
