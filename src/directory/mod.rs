//! Operator Directory Service
//!
//! Owns the cache and its background jobs. Reads go through the cache and
//! fall back to the backing store on a miss; write hooks invalidate whatever
//! the write may have made stale.

mod preload;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{keys, OperatorCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{ActivityPage, ListingPage, OperatorView};
use crate::source::{ListQuery, OperatorSource};
use crate::tasks::BackgroundTasks;

pub use preload::{common_list_queries, PreloadReport, Preloader, ACTIVITY_PAGE_LIMIT};

/// Page sizes the UI requests by default.
const COMMON_PAGE_LIMITS: [u32; 3] = [10, 20, 50];

/// Filter fields that common listing queries may constrain.
const COMMON_FILTER_FIELDS: [&str; 2] = ["status", "role"];

/// Cache-backed read path over the operator directory.
pub struct OperatorDirectory {
    cache: OperatorCache,
    source: Arc<dyn OperatorSource>,
    preloader: Preloader,
    config: Config,
    tasks: tokio::sync::Mutex<Option<BackgroundTasks>>,
}

impl OperatorDirectory {
    pub fn new(source: Arc<dyn OperatorSource>, config: Config) -> Self {
        let cache = OperatorCache::from_config(&config);
        let preloader = Preloader::new(cache.clone(), source.clone(), &config);
        Self {
            cache,
            source,
            preloader,
            config,
            tasks: tokio::sync::Mutex::new(None),
        }
    }

    pub fn cache(&self) -> &OperatorCache {
        &self.cache
    }

    pub fn preloader(&self) -> &Preloader {
        &self.preloader
    }

    // == Lifecycle ==
    /// Starts the janitor, preload and stats-log jobs. The first preload runs
    /// immediately. Calling `start` on a running directory is a no-op.
    pub async fn start(&self) {
        let mut tasks = self.tasks.lock().await;
        if tasks.is_some() {
            debug!("Operator directory already started");
            return;
        }

        *tasks = Some(BackgroundTasks::spawn(
            self.cache.clone(),
            self.preloader.clone(),
            &self.config,
        ));
        info!("Operator directory started");
    }

    /// Stops the background jobs and waits for them to exit.
    pub async fn stop(&self) {
        let tasks = self.tasks.lock().await.take();
        if let Some(tasks) = tasks {
            tasks.shutdown().await;
            info!("Operator directory stopped");
        }
    }

    // == Reads ==
    /// Returns one operator, from cache when possible.
    ///
    /// A cached entity close to expiry has its lifetime extended without
    /// re-fetching.
    pub async fn get_operator(&self, operator_id: &str) -> Result<OperatorView> {
        let key = keys::operator_key(operator_id);

        // Renewal only moves the expiry; the read records the hit or miss.
        self.cache.verify_and_renew(&key);
        if let Some(operator) = self.cache.get::<OperatorView>(&key) {
            debug!("Cache hit for {}", key);
            return Ok(operator);
        }

        let operator = self
            .source
            .find_operator(operator_id)
            .await?
            .ok_or_else(|| CacheError::NotFound(format!("operator {}", operator_id)))?;

        self.cache.set(key, operator.clone(), None);
        Ok(operator)
    }

    /// Returns one page of operators matching `filter`.
    ///
    /// Common query shapes are cached for longer than ad-hoc ones.
    pub async fn list_operators(
        &self,
        page: u32,
        limit: u32,
        filter: Option<Value>,
    ) -> Result<ListingPage> {
        let query = ListQuery::new(page, limit, filter);
        let key = keys::operators_list_key(query.page, query.limit, query.filter.as_ref());

        if let Some(listing) = self.cache.get::<ListingPage>(&key) {
            debug!("Cache hit for {}", key);
            return Ok(listing);
        }

        let listing = self.source.list_operators(&query).await?;
        self.cache.set(key, listing.clone(), Some(self.listing_ttl(&query)));
        Ok(listing)
    }

    /// Returns one page of an operator's activity feed.
    pub async fn operator_activities(
        &self,
        operator_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<ActivityPage> {
        let page = page.max(1);
        let key = keys::operator_activities_key(operator_id, page, limit);

        if let Some(activities) = self.cache.get::<ActivityPage>(&key) {
            debug!("Cache hit for {}", key);
            return Ok(activities);
        }

        let activities = self
            .source
            .operator_activities(operator_id, page, limit)
            .await?;
        self.cache.set(key, activities.clone(), None);
        Ok(activities)
    }

    // == Write Hooks ==
    /// A new operator appears in listings.
    pub fn operator_created(&self, operator_id: &str) {
        self.invalidate_operator(operator_id);
    }

    /// An operator's fields changed; listings embed them.
    pub fn operator_updated(&self, operator_id: &str) {
        self.invalidate_operator(operator_id);
    }

    /// Credentials changed. The cached view carries no secrets but may carry
    /// a status change that came with the reset.
    pub fn password_changed(&self, operator_id: &str) {
        self.invalidate_operator(operator_id);
    }

    /// An operator is gone, along with everything scoped under it.
    pub fn operator_deleted(&self, operator_id: &str) {
        self.invalidate_operator(operator_id);
        let removed = self
            .cache
            .invalidate_pattern(&keys::operator_artifacts_pattern(operator_id))
            .unwrap_or_default();
        debug!("Dropped {} cached artifacts of operator {}", removed, operator_id);
    }

    fn invalidate_operator(&self, operator_id: &str) {
        self.cache.invalidate(&keys::operator_key(operator_id));
        let removed = self
            .cache
            .invalidate_pattern(keys::LIST_KEYS_PATTERN)
            .unwrap_or_default();
        debug!(
            "Invalidated operator {} and {} listing pages",
            operator_id, removed
        );
    }

    // == TTL Policy ==
    /// TTL for a listing result, chosen by query shape.
    pub fn listing_ttl(&self, query: &ListQuery) -> Duration {
        if is_common_query(query) {
            self.config.common_query_ttl()
        } else {
            self.config.default_ttl()
        }
    }
}

/// First page, a standard page size, and at most a status/role constraint.
pub fn is_common_query(query: &ListQuery) -> bool {
    if query.page != 1 || !COMMON_PAGE_LIMITS.contains(&query.limit) {
        return false;
    }

    match &query.filter {
        None | Some(Value::Null) => true,
        Some(Value::Object(fields)) => fields
            .iter()
            .filter(|(_, v)| !v.is_null())
            .all(|(field, _)| COMMON_FILTER_FIELDS.contains(&field.as_str())),
        Some(_) => false,
    }
}
