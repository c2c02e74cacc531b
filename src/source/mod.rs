//! Backing Store Interface
//!
//! The cache never writes through; it only reads operator, listing and
//! activity rows from an [`OperatorSource`].

mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::keys;
use crate::error::Result;
use crate::models::{ActivityPage, ListingPage, OperatorView};

pub use memory::InMemoryOperatorSource;

/// Paginated, filtered listing request. Pages are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    /// JSON object of field constraints, `None` for no filter
    pub filter: Option<Value>,
}

impl ListQuery {
    /// Builds a query whose filter matches the one its cache key is derived
    /// from: null-valued fields are dropped and an empty filter is `None`.
    pub fn new(page: u32, limit: u32, filter: Option<Value>) -> Self {
        Self {
            page: page.max(1),
            limit,
            filter: keys::normalize_filter(filter),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit as usize
    }
}

/// Read-only access to the durable operator directory.
#[async_trait]
pub trait OperatorSource: Send + Sync {
    /// Looks up one operator by id.
    async fn find_operator(&self, operator_id: &str) -> Result<Option<OperatorView>>;

    /// Returns one page of operators matching the query's filter.
    async fn list_operators(&self, query: &ListQuery) -> Result<ListingPage>;

    /// Returns up to `limit` active operators, most recently active first.
    async fn recent_active_operators(&self, limit: usize) -> Result<Vec<OperatorView>>;

    /// Returns one page of an operator's activity feed, newest first.
    async fn operator_activities(
        &self,
        operator_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<ActivityPage>;
}
