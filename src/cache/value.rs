//! Cache Value Module
//!
//! Tagged payload union stored in every cache entry, with typed access per call site.

use crate::models::{ActivityPage, ListingPage, OperatorView};

// == Cache Value ==
/// Payload held by a cache entry.
///
/// Each variant belongs to one key namespace (see [`crate::cache::keys`]).
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    /// `operator:{id}`
    Operator(OperatorView),
    /// `operators:list:{page}:{limit}:{filter}`
    Listing(ListingPage),
    /// `operator:{id}:activities:{page}:{limit}`
    Activities(ActivityPage),
}

impl CacheValue {
    /// Short variant name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheValue::Operator(_) => "operator",
            CacheValue::Listing(_) => "listing",
            CacheValue::Activities(_) => "activities",
        }
    }
}

// == Cacheable ==
/// Types that can be stored in and read back from the cache.
pub trait Cacheable: Sized {
    fn into_cache_value(self) -> CacheValue;

    /// Returns `None` when the value holds a different variant.
    fn from_cache_value(value: CacheValue) -> Option<Self>;
}

impl Cacheable for CacheValue {
    fn into_cache_value(self) -> CacheValue {
        self
    }

    fn from_cache_value(value: CacheValue) -> Option<Self> {
        Some(value)
    }
}

impl Cacheable for OperatorView {
    fn into_cache_value(self) -> CacheValue {
        CacheValue::Operator(self)
    }

    fn from_cache_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Operator(view) => Some(view),
            _ => None,
        }
    }
}

impl Cacheable for ListingPage {
    fn into_cache_value(self) -> CacheValue {
        CacheValue::Listing(self)
    }

    fn from_cache_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Listing(page) => Some(page),
            _ => None,
        }
    }
}

impl Cacheable for ActivityPage {
    fn into_cache_value(self) -> CacheValue {
        CacheValue::Activities(self)
    }

    fn from_cache_value(value: CacheValue) -> Option<Self> {
        match value {
            CacheValue::Activities(page) => Some(page),
            _ => None,
        }
    }
}
