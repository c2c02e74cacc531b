//! Error types for the operator cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache, the directory service and the admin API.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalidation pattern failed to compile
    #[error("Invalid invalidation pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Backing store query failed
    #[error("Backing store error: {0}")]
    Backend(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidPattern { .. } => StatusCode::BAD_REQUEST,
            CacheError::Backend(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the operator cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (CacheError::NotFound("operator 7".into()), StatusCode::NOT_FOUND),
            (CacheError::Backend("down".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_invalid_pattern_is_bad_request() {
        let err = CacheError::InvalidPattern {
            pattern: "^operators:(".into(),
            reason: "unclosed group".into(),
        };
        assert!(err.to_string().contains("^operators:("));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
