//! Event handlers for GitHub webhook events.
//!
//! Handlers receive an already-parsed event, the repository's resolved
//! [`PolicyConfig`](crate::config::PolicyConfig) and a client scoped to that
//! repository, and perform the configured side effects directly.
//!
//! | Event | Handler |
//! |-------|---------|
//! | `pull_request` | [`handle_pull_request`] - ordered policy pipeline |
//! | `issue_comment` | [`handle_issue_comment`] - slash-command dispatch |
//!
//! Disabled features, non-maintainer commands and unmergeable PRs are not
//! errors. A handler only fails when a GitHub or media call fails, and the
//! first failure stops it.

mod issue_comment;
mod pull_request;

use thiserror::Error;

use crate::checks::CheckError;
use crate::fun::MediaError;
use crate::github::GitHubApiError;

pub use issue_comment::handle_issue_comment;
pub use pull_request::{PipelineReport, handle_pull_request};

/// Errors that can occur during event handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("GitHub call failed: {0}")]
    GitHub(#[from] GitHubApiError),

    #[error("check failed: {0}")]
    Check(#[from] CheckError),

    #[error("media lookup failed: {0}")]
    Media(#[from] MediaError),
}
