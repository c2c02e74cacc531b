//! In-memory operator source, used by the demo binary and tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::{
    ActivityPage, ActivityRecord, BranchSummary, ListingPage, OperatorRole, OperatorStatus,
    OperatorView,
};
use crate::source::{ListQuery, OperatorSource};

/// Operator directory held in process memory.
///
/// Supports failure injection and artificial latency, and counts the
/// queries it serves.
#[derive(Debug, Default)]
pub struct InMemoryOperatorSource {
    operators: RwLock<Vec<OperatorView>>,
    activities: RwLock<Vec<ActivityRecord>>,
    failing: AtomicBool,
    latency: Mutex<Option<Duration>>,
    queries: AtomicUsize,
}

impl InMemoryOperatorSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory of `count` operators spread over three branches,
    /// each with a few activity records.
    pub fn with_sample_data(count: usize) -> Self {
        let source = Self::new();
        let branches = [
            ("br-1", "North Hub", "Leeds"),
            ("br-2", "Port Depot", "Felixstowe"),
            ("br-3", "City Sort", "Birmingham"),
        ];
        let now = Utc::now();

        for i in 0..count {
            let (branch_id, name, city) = branches[i % branches.len()];
            let status = match i % 7 {
                5 => OperatorStatus::Inactive,
                6 => OperatorStatus::Suspended,
                _ => OperatorStatus::Active,
            };
            source.upsert_operator(OperatorView {
                id: format!("{}", i + 1),
                username: format!("operator{}", i + 1),
                email: format!("operator{}@depot.example", i + 1),
                full_name: format!("Operator {}", i + 1),
                role: OperatorRole::ALL[i % OperatorRole::ALL.len()],
                status,
                branch: Some(BranchSummary {
                    id: branch_id.to_string(),
                    name: name.to_string(),
                    city: city.to_string(),
                }),
                last_active_at: Some(now - ChronoDuration::minutes(i as i64)),
                created_at: now - ChronoDuration::days(30),
            });

            for n in 0..3u64 {
                source.add_activity(ActivityRecord {
                    id: (i as u64) * 10 + n,
                    operator_id: format!("{}", i + 1),
                    action: "shipment.scan".to_string(),
                    description: format!("Scanned parcel batch {}", n),
                    created_at: now - ChronoDuration::minutes((i as i64) + n as i64),
                });
            }
        }

        source
    }

    // == Mutation ==
    /// Inserts or replaces an operator by id.
    pub fn upsert_operator(&self, operator: OperatorView) {
        let mut operators = self.operators.write();
        match operators.iter_mut().find(|o| o.id == operator.id) {
            Some(existing) => *existing = operator,
            None => operators.push(operator),
        }
    }

    /// Removes an operator and its activity feed.
    pub fn remove_operator(&self, operator_id: &str) -> bool {
        let mut operators = self.operators.write();
        let before = operators.len();
        operators.retain(|o| o.id != operator_id);
        self.activities.write().retain(|a| a.operator_id != operator_id);
        operators.len() != before
    }

    pub fn add_activity(&self, activity: ActivityRecord) {
        self.activities.write().push(activity);
    }

    // == Test Controls ==
    /// Makes every subsequent query fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every subsequent query by `latency`.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Number of queries served or attempted so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    async fn begin_query(&self, name: &str) -> Result<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError::Backend(format!("{} unavailable", name)));
        }
        debug!("In-memory source query: {}", name);
        Ok(())
    }
}

#[async_trait]
impl OperatorSource for InMemoryOperatorSource {
    async fn find_operator(&self, operator_id: &str) -> Result<Option<OperatorView>> {
        self.begin_query("find_operator").await?;
        Ok(self
            .operators
            .read()
            .iter()
            .find(|o| o.id == operator_id)
            .cloned())
    }

    async fn list_operators(&self, query: &ListQuery) -> Result<ListingPage> {
        self.begin_query("list_operators").await?;

        let operators = self.operators.read();
        let matching: Vec<&OperatorView> = operators
            .iter()
            .filter(|o| matches_filter(o, query.filter.as_ref()))
            .collect();

        Ok(ListingPage {
            total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(query.offset())
                .take(query.limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn recent_active_operators(&self, limit: usize) -> Result<Vec<OperatorView>> {
        self.begin_query("recent_active_operators").await?;

        let mut active: Vec<OperatorView> = self
            .operators
            .read()
            .iter()
            .filter(|o| o.status == OperatorStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.last_active_at.cmp(&a.last_active_at));
        active.truncate(limit);
        Ok(active)
    }

    async fn operator_activities(
        &self,
        operator_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<ActivityPage> {
        self.begin_query("operator_activities").await?;

        let mut feed: Vec<ActivityRecord> = self
            .activities
            .read()
            .iter()
            .filter(|a| a.operator_id == operator_id)
            .cloned()
            .collect();
        feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = ListQuery::new(page, limit, None).offset();
        Ok(ActivityPage {
            total: feed.len() as u64,
            activities: feed.into_iter().skip(offset).take(limit as usize).collect(),
        })
    }
}

/// Applies a JSON filter object. Unknown fields are ignored.
fn matches_filter(operator: &OperatorView, filter: Option<&Value>) -> bool {
    let Some(Value::Object(fields)) = filter else {
        return true;
    };

    fields.iter().all(|(field, expected)| match field.as_str() {
        "status" => serde_json::to_value(operator.status).ok().as_ref() == Some(expected),
        "role" => serde_json::to_value(operator.role).ok().as_ref() == Some(expected),
        "branch_id" => match (&operator.branch, expected.as_str()) {
            (Some(branch), Some(id)) => branch.id == id,
            _ => expected.is_null(),
        },
        "search" => expected.as_str().map_or(true, |needle| {
            let needle = needle.to_lowercase();
            operator.username.to_lowercase().contains(&needle)
                || operator.full_name.to_lowercase().contains(&needle)
                || operator.email.to_lowercase().contains(&needle)
        }),
        _ => true,
    })
}
