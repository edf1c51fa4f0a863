//! Error types for Gitea API operations.

use std::time::Duration;

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur when interacting with the Gitea API.
#[derive(Debug, Error)]
pub enum GiteaError {
    /// The transport failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded and retries (if any) were exhausted.
    #[error("Rate limit exceeded{}", retry_after_suffix(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// Options failed client-side validation; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// A lookup emulated client-side found nothing.
    #[error("{0}")]
    NotFound(String),

    /// The server version does not satisfy a constraint passed by the caller.
    #[error("gitea server at {url} does not satisfy version constraint {constraint}")]
    VersionConstraint { url: String, constraint: String },

    /// The endpoint needs a newer server.
    #[error("gitea server at {url} is older than {required}")]
    ServerTooOld { url: String, required: String },

    /// A version string or constraint could not be parsed.
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    /// The server answered with a status the endpoint does not document.
    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<HttpError> for GiteaError {
    fn from(err: HttpError) -> Self {
        GiteaError::Http(err.to_string())
    }
}

impl GiteaError {
    /// HTTP status carried by the error, if the server produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GiteaError::Api { status, .. } => Some(*status),
            GiteaError::UnexpectedStatus(status) => Some(*status),
            GiteaError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, GiteaError::NotFound(_)) || self.status() == Some(404)
    }
}

fn retry_after_suffix(retry_after: &Option<Duration>) -> String {
    retry_after
        .map(|d| format!(", retry after {}s", d.as_secs()))
        .unwrap_or_default()
}

/// Check if an error is a rate limit error.
pub fn is_rate_limit_error(err: &GiteaError) -> bool {
    matches!(
        err,
        GiteaError::RateLimited { .. } | GiteaError::Api { status: 429, .. }
    )
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &GiteaError) -> String {
    match err {
        GiteaError::Http(_) => "Network error".to_string(),
        GiteaError::Json(_) => "JSON parse error".to_string(),
        GiteaError::Api { status, message } => {
            if message.chars().count() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
        GiteaError::RateLimited { .. } => "Rate limited".to_string(),
        GiteaError::Validation(msg) => format!("Invalid options: {}", msg),
        GiteaError::NotFound(msg) => msg.clone(),
        GiteaError::VersionConstraint { constraint, .. } => {
            format!("Server does not satisfy {}", constraint)
        }
        GiteaError::ServerTooOld { required, .. } => format!("Server older than {}", required),
        GiteaError::InvalidVersion(v) => format!("Invalid version: {}", v),
        GiteaError::UnexpectedStatus(status) => format!("Unexpected HTTP {}", status),
        GiteaError::Config(msg) => format!("Config: {}", msg),
    }
}

/// Pull a human readable message out of an error response body.
///
/// Gitea answers most failures with `{"message": "...", "url": "..."}`; other
/// bodies are returned verbatim and empty bodies fall back to the status line.
pub(crate) fn api_error_message(status: u16, body: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct ApiErrorBody {
        message: Option<String>,
    }

    if let Ok(ApiErrorBody { message: Some(m) }) = serde_json::from_slice::<ApiErrorBody>(body)
        && !m.is_empty()
    {
        return m;
    }

    let text = String::from_utf8_lossy(body).trim().to_string();
    if !text.is_empty() {
        return text;
    }

    format!("{} {}", status, status_reason(status))
}

fn status_reason(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        412 => "Precondition Failed",
        422 => "Unprocessable Entity",
        423 => "Locked",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown Status",
    }
}
