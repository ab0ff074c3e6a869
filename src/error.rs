//! Error types for the cache and lifespan components
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::lifespan::Phase;

// == Cache Error Enum ==
/// Unified error type for cache strategies and the HTTP layer.
///
/// Absent or expired keys are not errors: strategies report them as `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (raised by the HTTP layer only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The configured backend does not offer this operation
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The remote store could not be reached or rejected a command
    #[error("Connection error: {0}")]
    Connection(#[from] redis::RedisError),

    /// A stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            CacheError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Lifespan Error Enum ==
/// Errors raised while entering or exiting a [`Lifespan`](crate::lifespan::Lifespan).
#[derive(Error, Debug)]
pub enum LifespanError {
    /// A phase did not finish within the configured deadline
    #[error("{phase} phase timed out after {timeout:?}")]
    Timeout { phase: Phase, timeout: Duration },

    /// A registered action failed; the rest of the phase was skipped
    #[error("{phase} action failed")]
    Action {
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    /// The stored states value is not a JSON object
    #[error("States must be a mapping, got {0}")]
    InvalidStates(String),

    /// `enter`/`exit` called from the wrong phase
    #[error("Cannot {operation} lifespan while {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: Phase,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_status() {
        let response = CacheError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let response = CacheError::NotFound("k".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unsupported_status() {
        let response = CacheError::Unsupported("stats".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[test]
    fn test_lifespan_timeout_message() {
        let err = LifespanError::Timeout {
            phase: Phase::Entering,
            timeout: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "entering phase timed out after 2s");
    }

    #[test]
    fn test_lifespan_action_cause_is_in_source_chain() {
        use std::error::Error as _;

        let err = LifespanError::Action {
            phase: Phase::Exiting,
            source: anyhow::anyhow!("flush failed"),
        };
        assert_eq!(err.to_string(), "exiting action failed");
        assert_eq!(err.source().unwrap().to_string(), "flush failed");
    }
}
