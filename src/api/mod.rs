//! API client module for submitting forms over HTTP

mod client;
mod traits;

pub use client::HttpApiClient;
pub use traits::ApiClientTrait;

#[cfg(test)]
pub use traits::MockApiClientTrait;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A successful API reply
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<R> {
    pub status: u16,
    pub data: R,
}

impl<R> ApiResponse<R> {
    pub fn ok(data: R) -> Self {
        Self { status: 200, data }
    }
}

impl ApiResponse<Value> {
    /// Deserialize the JSON payload into a typed response
    pub fn decode<R: DeserializeOwned>(self) -> Result<ApiResponse<R>, ApiError> {
        let data = serde_json::from_value(self.data).map_err(|e| {
            ApiError::Transport(anyhow::anyhow!("Failed to decode response: {}", e))
        })?;
        Ok(ApiResponse {
            status: self.status,
            data,
        })
    }
}

/// A failed API call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("request failed with status {status}")]
    Response { status: u16, body: Value },

    /// No usable response (connection, timeout, decoding...)
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl ApiError {
    fn body_field(&self, key: &str) -> Option<&Value> {
        match self {
            ApiError::Response { body, .. } => body.get(key).filter(|v| !v.is_null()),
            ApiError::Transport(_) => None,
        }
    }

    /// `validations` field of the response body
    pub fn validations(&self) -> Option<&Value> {
        self.body_field("validations")
    }

    /// `message` field of the response body, when it is a non-empty string
    pub fn message(&self) -> Option<&str> {
        self.body_field("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }
}
