//! GitHub API error types.
//!
//! Nothing in the bot retries automatically, but the kind is still recorded so
//! log lines say whether an operator should expect a failure to clear up on
//! the next delivery or sweep:
//!
//! - **Transient**: 5xx, rate limits, network failures
//! - **Permanent**: most 4xx, unexpected response shapes
//! - **Cancelled**: the request or sweep was cancelled while the call was in flight

use std::fmt;
use thiserror::Error;

/// The kind of GitHub API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubErrorKind {
    /// Likely to succeed if the same call is made later.
    Transient,

    /// Requires a change on the GitHub side (permissions, missing resource, ...).
    Permanent,

    /// The call was abandoned because its cancellation token fired.
    Cancelled,
}

impl GitHubErrorKind {
    pub fn is_transient(&self) -> bool {
        matches!(self, GitHubErrorKind::Transient)
    }
}

impl fmt::Display for GitHubErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GitHubErrorKind::Transient => "transient",
            GitHubErrorKind::Permanent => "permanent",
            GitHubErrorKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A GitHub API error with a coarse categorization.
#[derive(Debug, Error)]
pub struct GitHubApiError {
    pub kind: GitHubErrorKind,

    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    pub message: String,

    /// The underlying octocrab error, if available.
    #[source]
    pub source: Option<octocrab::Error>,
}

impl fmt::Display for GitHubApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "GitHub API error (HTTP {}): {}", code, self.message),
            None => write!(f, "GitHub API error: {}", self.message),
        }
    }
}

impl GitHubApiError {
    /// Creates a permanent error without an octocrab source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: GitHubErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates the error returned when a call is abandoned on cancellation.
    pub fn cancelled() -> Self {
        Self {
            kind: GitHubErrorKind::Cancelled,
            status_code: None,
            message: "operation cancelled".to_string(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }

    /// Categorizes an octocrab error.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        let status_code = status_code_of(&err);
        let message = err.to_string();

        let kind = match status_code {
            Some(429) => GitHubErrorKind::Transient,
            Some(403) if is_rate_limit_error(&message) => GitHubErrorKind::Transient,
            Some(code) if (500..600).contains(&code) => GitHubErrorKind::Transient,
            Some(_) => GitHubErrorKind::Permanent,
            None if is_network_error(&message) => GitHubErrorKind::Transient,
            None => GitHubErrorKind::Permanent,
        };

        Self {
            kind,
            status_code,
            message,
            source: Some(err),
        }
    }
}

/// Extracts the HTTP status code from an octocrab error.
///
/// Only `Error::GitHub` carries a structured status; transport errors have none.
fn status_code_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

fn is_rate_limit_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("rate limit")
        || message_lower.contains("secondary rate")
        || message_lower.contains("abuse detection")
}

fn is_network_error(message: &str) -> bool {
    let message_lower = message.to_lowercase();
    message_lower.contains("timeout")
        || message_lower.contains("timed out")
        || message_lower.contains("connection")
        || message_lower.contains("dns")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_detection() {
        assert!(is_rate_limit_error("API rate limit exceeded"));
        assert!(is_rate_limit_error("You have exceeded a secondary rate limit"));
        assert!(!is_rate_limit_error("Resource not accessible by integration"));
    }

    #[test]
    fn network_error_detection() {
        assert!(is_network_error("connection reset by peer"));
        assert!(is_network_error("request timed out"));
        assert!(!is_network_error("Not Found"));
    }

    #[test]
    fn cancelled_error_has_no_status() {
        let err = GitHubApiError::cancelled();
        assert_eq!(err.kind, GitHubErrorKind::Cancelled);
        assert_eq!(err.status_code, None);
        assert!(!err.kind.is_transient());
    }

    #[test]
    fn display_includes_status_when_known() {
        let mut err = GitHubApiError::permanent_without_source("Not Found");
        assert_eq!(err.to_string(), "GitHub API error: Not Found");
        err.status_code = Some(404);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "GitHub API error (HTTP 404): Not Found");
    }
}
