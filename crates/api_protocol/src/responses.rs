//! Response types.

use serde::{Deserialize, Serialize};

/// Outcome marker carried by every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// `{ "status": "success", "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    /// Wraps a payload.
    pub fn new(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }
}

/// `{ "status": "error", "error": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error body with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: error.into(),
        }
    }
}
