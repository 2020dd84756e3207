//! GitHub webhook event types.
//!
//! Typed representations of the webhook events the bot acts on, with only the
//! fields the policy engine reads.
//!
//! - `pull_request` drives the pull request policy pipeline
//! - `issue_comment` drives the slash-command dispatcher
//!
//! Every other event type is carried as [`GitHubEvent::Other`] and acknowledged
//! without doing anything.

use serde::{Deserialize, Serialize};

use crate::types::{InstallationId, PrNumber, PullRequestData, RepoId};

/// A parsed GitHub webhook event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GitHubEvent {
    PullRequest(PullRequestEvent),

    /// A comment on an issue or on a PR's conversation tab.
    IssueComment(IssueCommentEvent),

    /// Any event type the bot does not handle, by its `X-GitHub-Event` name.
    Other(String),
}

impl GitHubEvent {
    pub fn installation(&self) -> Option<InstallationId> {
        match self {
            GitHubEvent::PullRequest(e) => e.installation,
            GitHubEvent::IssueComment(e) => e.installation,
            GitHubEvent::Other(_) => None,
        }
    }
}

/// Action performed on a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrAction {
    Opened,
    Closed,
    Reopened,
    Edited,
    Synchronize,
    /// Actions no policy looks at (`labeled`, `assigned`, ...).
    Other(String),
}

impl PrAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => PrAction::Opened,
            "closed" => PrAction::Closed,
            "reopened" => PrAction::Reopened,
            "edited" => PrAction::Edited,
            "synchronize" => PrAction::Synchronize,
            other => PrAction::Other(other.to_string()),
        }
    }
}

/// A pull request event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    pub repo: RepoId,

    /// Where the head branch lives. Differs from `repo` for forks, and is
    /// `None` once a fork has been deleted.
    pub head_repo: Option<RepoId>,

    /// The repository's default branch, where the policy file is read.
    pub default_branch: String,

    /// The app installation that received the delivery.
    pub installation: Option<InstallationId>,

    pub action: PrAction,

    /// Login of the user whose action triggered the event.
    pub sender: String,

    /// Whether the PR was merged (only meaningful for `closed`).
    pub merged: bool,

    pub pull_request: PullRequestData,
}

impl PullRequestEvent {
    pub fn number(&self) -> PrNumber {
        self.pull_request.number
    }
}

/// Action performed on an issue comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAction {
    Created,
    Edited,
    Deleted,
    Other(String),
}

impl CommentAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "created" => CommentAction::Created,
            "edited" => CommentAction::Edited,
            "deleted" => CommentAction::Deleted,
            other => CommentAction::Other(other.to_string()),
        }
    }
}

/// An issue or PR comment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub repo: RepoId,
    pub default_branch: String,
    pub installation: Option<InstallationId>,
    pub action: CommentAction,

    /// The issue number; for PR comments this is the PR number.
    pub number: PrNumber,

    /// Whether the issue is a pull request.
    pub is_pull_request: bool,

    pub body: String,

    /// Login of the comment author.
    pub author: String,
}
