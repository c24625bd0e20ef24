//! API response envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

/// `{"status": "ok", "data": ...}` or
/// `{"status": "error", "code": ..., "message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok { data: Value },
    Error { code: String, message: String },
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response::Ok { data }
    }

    pub fn error(err: &ApiError) -> Self {
        Self::error_with(err.code(), err.to_string())
    }

    pub fn error_with(code: &str, message: impl Into<String>) -> Self {
        Response::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }

    /// Single-line JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("Response serialization cannot fail")
    }
}
