//! Preloader
//!
//! Re-primes the cache with the data shapes the read path needs most: hot
//! operator records, a fixed set of common listing pages, and the first
//! activity page of the hottest operators. Every write uses the preload TTL.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::{keys, OperatorCache};
use crate::config::Config;
use crate::models::{OperatorFilter, OperatorRole, OperatorStatus};
use crate::source::{ListQuery, OperatorSource};

/// Page size used for preloaded activity pages.
pub const ACTIVITY_PAGE_LIMIT: u32 = 20;

/// Listing queries warmed on every preload run.
pub fn common_list_queries() -> Vec<ListQuery> {
    let mut queries = vec![
        ListQuery::new(1, 20, Some(OperatorFilter::status(OperatorStatus::Active).to_value())),
        ListQuery::new(
            1,
            20,
            Some(OperatorFilter::status(OperatorStatus::Inactive).to_value()),
        ),
    ];
    queries.extend(
        OperatorRole::ALL
            .iter()
            .map(|role| ListQuery::new(1, 20, Some(OperatorFilter::role(*role).to_value()))),
    );
    queries.push(ListQuery::new(1, 50, None));
    queries
}

/// Outcome of one preload run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreloadReport {
    pub operators: usize,
    pub listings: usize,
    pub activity_pages: usize,
    /// Steps whose backing-store query failed
    pub failures: usize,
    /// True when shutdown interrupted the run
    pub cancelled: bool,
}

/// Warms the cache from an [`OperatorSource`].
#[derive(Clone)]
pub struct Preloader {
    cache: OperatorCache,
    source: Arc<dyn OperatorSource>,
    ttl: Duration,
    operator_count: usize,
    activity_count: usize,
    list_queries: Vec<ListQuery>,
}

impl Preloader {
    pub fn new(cache: OperatorCache, source: Arc<dyn OperatorSource>, config: &Config) -> Self {
        Self {
            cache,
            source,
            ttl: config.preload_ttl(),
            operator_count: config.preload_operator_count,
            activity_count: config.preload_activity_count,
            list_queries: common_list_queries(),
        }
    }

    /// Runs a preload to completion.
    pub async fn run(&self) -> PreloadReport {
        let (_tx, rx) = watch::channel(false);
        self.run_until(&rx).await
    }

    /// Runs a preload, stopping once `shutdown` reads true.
    ///
    /// A query already in flight when shutdown is signalled is awaited and its
    /// result discarded; nothing is written after the signal. Backing-store
    /// failures are logged and counted, and never abort the remaining steps.
    pub async fn run_until(&self, shutdown: &watch::Receiver<bool>) -> PreloadReport {
        let mut report = PreloadReport::default();
        let stopping = || *shutdown.borrow();

        // Step 1: hot operator records
        let hot = match self.source.recent_active_operators(self.operator_count).await {
            Ok(operators) => operators,
            Err(e) => {
                warn!("Preload: failed to fetch recent operators: {}", e);
                report.failures += 1;
                Vec::new()
            }
        };
        if stopping() {
            return self.cancelled(report);
        }
        for operator in &hot {
            self.cache
                .set(keys::operator_key(&operator.id), operator.clone(), Some(self.ttl));
            report.operators += 1;
        }

        // Step 2: common listing pages
        for query in &self.list_queries {
            let result = self.source.list_operators(query).await;
            if stopping() {
                return self.cancelled(report);
            }
            match result {
                Ok(page) => {
                    let key =
                        keys::operators_list_key(query.page, query.limit, query.filter.as_ref());
                    self.cache.set(key, page, Some(self.ttl));
                    report.listings += 1;
                }
                Err(e) => {
                    let filter = query
                        .filter
                        .as_ref()
                        .map_or_else(|| "{}".to_string(), |filter| filter.to_string());
                    warn!(
                        "Preload: failed to fetch listing page {} (limit {}, filter {}): {}",
                        query.page, query.limit, filter, e
                    );
                    report.failures += 1;
                }
            }
        }

        // Step 3: first activity page of the hottest operators
        for operator in hot.iter().take(self.activity_count) {
            let result = self
                .source
                .operator_activities(&operator.id, 1, ACTIVITY_PAGE_LIMIT)
                .await;
            if stopping() {
                return self.cancelled(report);
            }
            match result {
                Ok(page) => {
                    let key = keys::operator_activities_key(&operator.id, 1, ACTIVITY_PAGE_LIMIT);
                    self.cache.set(key, page, Some(self.ttl));
                    report.activity_pages += 1;
                }
                Err(e) => {
                    warn!(
                        "Preload: failed to fetch activities for operator {}: {}",
                        operator.id, e
                    );
                    report.failures += 1;
                }
            }
        }

        self.cache.mark_preload();
        info!(
            "Preload complete: {} operators, {} listings, {} activity pages, {} failures",
            report.operators, report.listings, report.activity_pages, report.failures
        );
        report
    }

    fn cancelled(&self, mut report: PreloadReport) -> PreloadReport {
        debug!("Preload interrupted by shutdown, discarding in-flight result");
        report.cancelled = true;
        report
    }
}
