//! Data models
//!
//! Operator-directory value shapes held in the cache, and the DTOs returned
//! by the admin API.

pub mod operator;
pub mod responses;

// Re-export commonly used types
pub use operator::{
    ActivityPage, ActivityRecord, BranchSummary, ListingPage, OperatorFilter, OperatorRole,
    OperatorStatus, OperatorView,
};
pub use responses::{HealthResponse, InvalidateResponse, StatsResponse};
