//! Errors surfaced by the HTTP pipeline and everything built on it.

use serde_json::Value;

use crate::storage::StorageError;

/// Fallback shown when a failure carries no server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "an error occurred";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network failure, timeout, or the HTTP client could not be built.
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String>, body: Value },

    /// A success body was not valid JSON.
    #[error("response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The refresh endpoint answered without a usable access token.
    #[error("refresh response carried no access token")]
    MalformedRefresh,

    /// A response lacked a field the caller depends on.
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),

    /// A multipart part could not be assembled.
    #[error("invalid upload part `{name}`: {reason}")]
    InvalidFile { name: String, reason: String },
}

impl ApiError {
    /// Build a status error from a raw response body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = serde_json::from_str::<Value>(body).unwrap_or_else(|_| {
            if body.trim().is_empty() { Value::Null } else { Value::String(body.to_owned()) }
        });
        let message = server_message(&body);
        Self::Status { status, message, body }
    }

    /// HTTP status for server-side failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Message the server attached to the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message when present, `fallback` otherwise.
    #[must_use]
    pub fn display_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.server_message().unwrap_or(fallback)
    }
}

/// Pull `message` out of an error body. Validation errors arrive as an array
/// of strings, which are joined.
fn server_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
