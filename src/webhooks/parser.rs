//! GitHub webhook payload parser.
//!
//! Parses raw webhook JSON into typed [`GitHubEvent`] values.
//!
//! # Parsing Strategy
//!
//! 1. The event type is taken from the `X-GitHub-Event` header
//! 2. Handled types are deserialized into raw structs mirroring GitHub's JSON
//! 3. Other event types become [`GitHubEvent::Other`] without reading the body
//! 4. Malformed payloads for handled types return `Err`

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::types::{InstallationId, PrNumber, PrState, PullRequestData, RepoId, Sha};

use super::events::{CommentAction, GitHubEvent, IssueCommentEvent, PrAction, PullRequestEvent};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Parses a webhook payload into a typed event.
///
/// # Examples
///
/// ```
/// use paul::webhooks::{parse_webhook, GitHubEvent};
///
/// let event = parse_webhook("ping", b"{}").unwrap();
/// assert_eq!(event, GitHubEvent::Other("ping".to_string()));
///
/// assert!(parse_webhook("issue_comment", b"not json").is_err());
/// ```
pub fn parse_webhook(event_type: &str, payload: &[u8]) -> Result<GitHubEvent, ParseError> {
    match event_type {
        "pull_request" => parse_pull_request(payload).map(GitHubEvent::PullRequest),
        "issue_comment" => parse_issue_comment(payload).map(GitHubEvent::IssueComment),
        other => Ok(GitHubEvent::Other(other.to_string())),
    }
}

// ============================================================================
// Shared raw structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRepository {
    owner: RawUser,
    name: String,
    default_branch: Option<String>,
}

impl RawRepository {
    fn repo_id(&self) -> RepoId {
        RepoId::new(&self.owner.login, &self.name)
    }

    fn default_branch(&self) -> String {
        self.default_branch
            .clone()
            .unwrap_or_else(|| "main".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawInstallation {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

// ============================================================================
// pull_request event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    action: String,
    pull_request: RawPullRequest,
    repository: RawRepository,
    sender: RawUser,
    installation: Option<RawInstallation>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    state: String,
    merged: Option<bool>,
    body: Option<String>,
    user: RawUser,
    head: RawRef,
    base: RawRef,
    #[serde(default)]
    labels: Vec<RawLabel>,
    updated_at: DateTime<Utc>,
    mergeable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawRef {
    sha: String,
    #[serde(rename = "ref")]
    ref_name: String,
    repo: Option<RawRepository>,
}

fn parse_pull_request(payload: &[u8]) -> Result<PullRequestEvent, ParseError> {
    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;
    let pr = raw.pull_request;
    let merged = pr.merged.unwrap_or(false);

    let state = match (pr.state.as_str(), merged) {
        (_, true) => PrState::Merged,
        ("open", false) => PrState::Open,
        _ => PrState::Closed,
    };

    Ok(PullRequestEvent {
        repo: raw.repository.repo_id(),
        head_repo: pr.head.repo.as_ref().map(RawRepository::repo_id),
        default_branch: raw.repository.default_branch(),
        installation: raw.installation.map(|i| InstallationId(i.id)),
        action: PrAction::parse(&raw.action),
        sender: raw.sender.login,
        merged,
        pull_request: PullRequestData {
            number: PrNumber(pr.number),
            author: pr.user.login,
            body: pr.body.unwrap_or_default(),
            head_ref: pr.head.ref_name,
            head_sha: Sha::new(pr.head.sha),
            base_ref: pr.base.ref_name,
            state,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
            updated_at: pr.updated_at,
            mergeable: pr.mergeable,
        },
    })
}

// ============================================================================
// issue_comment event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawIssueCommentPayload {
    action: String,
    comment: RawComment,
    issue: RawIssue,
    repository: RawRepository,
    installation: Option<RawInstallation>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    body: Option<String>,
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
    // Present only when the issue is a pull request
    pull_request: Option<serde_json::Value>,
}

fn parse_issue_comment(payload: &[u8]) -> Result<IssueCommentEvent, ParseError> {
    let raw: RawIssueCommentPayload = serde_json::from_slice(payload)?;

    Ok(IssueCommentEvent {
        repo: raw.repository.repo_id(),
        default_branch: raw.repository.default_branch(),
        installation: raw.installation.map(|i| InstallationId(i.id)),
        action: CommentAction::parse(&raw.action),
        number: PrNumber(raw.issue.number),
        is_pull_request: raw.issue.pull_request.is_some(),
        body: raw.comment.body.unwrap_or_default(),
        author: raw.comment.user.login,
    })
}
