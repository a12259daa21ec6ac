//! Trait abstraction for the API client to enable mocking in tests

use super::{ApiError, ApiResponse};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for API client operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Send a JSON payload with POST
    async fn post(&self, path: &str, payload: Value) -> Result<ApiResponse<Value>, ApiError>;

    /// Send a JSON payload with PUT
    async fn put(&self, path: &str, payload: Value) -> Result<ApiResponse<Value>, ApiError>;
}
