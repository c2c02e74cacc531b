//! Operator Directory Models
//!
//! Value shapes the directory reads from the backing store and keeps in the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Enums ==
/// Staff role within the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    Admin,
    Manager,
    Dispatcher,
    Clerk,
}

impl OperatorRole {
    pub const ALL: [OperatorRole; 4] = [
        OperatorRole::Admin,
        OperatorRole::Manager,
        OperatorRole::Dispatcher,
        OperatorRole::Clerk,
    ];
}

/// Account status of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorStatus {
    Active,
    Inactive,
    Suspended,
}

// == Operator View ==
/// Branch an operator belongs to, denormalized into operator views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub id: String,
    pub name: String,
    pub city: String,
}

/// Single-operator view as served by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: OperatorRole,
    pub status: OperatorStatus,
    pub branch: Option<BranchSummary>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// == Activity ==
/// One entry of an operator's activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: u64,
    pub operator_id: String,
    pub action: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// == Pages ==
/// One page of a filtered operator listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingPage {
    pub items: Vec<OperatorView>,
    pub total: u64,
}

/// One page of an operator's activity feed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivityPage {
    pub activities: Vec<ActivityRecord>,
    pub total: u64,
}

// == Filter ==
/// Typed listing filter.
///
/// Converted to a JSON object before keying so that typed and untyped callers
/// share one key space. Unset fields are omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatorFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OperatorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<OperatorRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl OperatorFilter {
    pub fn status(status: OperatorStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn role(role: OperatorRole) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    /// JSON object form used for key derivation and backing-store queries.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}
