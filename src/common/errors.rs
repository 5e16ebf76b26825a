use serde::Serialize;
use thiserror::Error;

use crate::common::types::now_ms;

/// Every fallible radio operation fails with one of these. All of them are
/// recoverable by the caller (re-join, resubmit, fix input); none of them
/// leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RadioError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("unrecognized listener category: {0:?}")]
    InvalidCategory(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
}

impl RadioError {
    /// HTTP status the REST layer maps this error onto.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            _ => 400,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
    /// HTTP status code.
    pub status: u16,
    /// HTTP status reason phrase (e.g. "Bad Request").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
    /// The request path that caused the error.
    pub path: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        let error = match status {
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            _ => "Internal Server Error",
        };
        Self {
            timestamp: now_ms(),
            status,
            error: error.into(),
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(400, message, path)
    }

    pub fn not_found(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(404, message, path)
    }

    pub fn from_radio(err: &RadioError, path: impl Into<String>) -> Self {
        Self::new(err.status(), err.to_string(), path)
    }
}
