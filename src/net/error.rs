//! Error type shared by the REST clients.
//!
//! ERROR HANDLING
//! ==============
//! Views render `ApiError::to_string()` directly, so every variant's display
//! text is a user-facing sentence. Backend failures prefer the server's own
//! `message` field and fall back to a per-operation sentence.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::de::DeserializeOwned;

/// Failure of a remote API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A protected operation was attempted without a session token.
    #[error("Authentication required. Please log in to {action}.")]
    Unauthenticated { action: &'static str },
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// The response body did not match the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    /// A success response lacked a field the caller needs.
    #[error("{0}")]
    MissingField(&'static str),
    /// HTTP is only available in the browser build.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// HTTP status for backend failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extract the backend's `message` from an error body, or use `fallback`.
pub fn backend_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(serde_json::Value::as_str).map(str::to_owned))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Turn a status + body pair into a typed result.
///
/// # Errors
///
/// Returns `ApiError::Backend` for non-2xx statuses and `ApiError::Decode`
/// when a success body does not parse as `T`.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str, fallback: &str) -> Result<T, ApiError> {
    check_status(status, body, fallback)?;
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Accept any 2xx response, ignoring its body.
///
/// # Errors
///
/// Returns `ApiError::Backend` for non-2xx statuses.
pub fn check_status(status: u16, body: &str, fallback: &str) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ApiError::Backend { status, message: backend_message(body, fallback) })
    }
}

/// Fail fast when a protected operation has no token.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` naming `action` when `token` is absent or blank.
pub fn require_token<'a>(token: Option<&'a str>, action: &'static str) -> Result<&'a str, ApiError> {
    token.filter(|t| !t.is_empty()).ok_or(ApiError::Unauthenticated { action })
}
