//! Client error types

use crate::session::SessionError;
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors returned by journal API operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Form constraints failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend rejected the credentials or the session token (401).
    /// Any token the request carried has already been cleared.
    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    /// Any other non-2xx response
    #[error("API error {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    #[error("Journal service unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    /// Classify a transport failure
    pub(crate) fn transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if error.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(error)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    /// The backend's `detail` message, when it sent one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized { detail } | ClientError::Api { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// Message to show the user: backend detail verbatim, the failed form
    /// constraint, or the caller's fallback.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(e) => e.to_string(),
            other => other.detail().unwrap_or(fallback).to_string(),
        }
    }
}

/// Pull a string `detail` field out of an error body
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}
