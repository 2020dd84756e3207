//! Pull request, commit and check run snapshots.
//!
//! These are the shapes the policy engine reads. They are built fresh from the
//! GitHub API (or a webhook payload) for each delivery or sweep and never
//! mutated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CheckRunId, PrNumber, RepoId, Sha};

/// The lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl PrState {
    pub fn is_open(&self) -> bool {
        matches!(self, PrState::Open)
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, PrState::Merged)
    }
}

/// A snapshot of a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestData {
    pub number: PrNumber,

    /// Login of the user who opened the PR.
    pub author: String,

    /// The PR description. `None` bodies from the API become an empty string.
    pub body: String,

    pub head_ref: String,
    pub head_sha: Sha,
    pub base_ref: String,
    pub state: PrState,

    /// Label names currently applied to the PR.
    pub labels: Vec<String>,

    pub updated_at: DateTime<Utc>,

    /// GitHub's mergeability verdict.
    ///
    /// Only populated when the PR is fetched individually; list endpoints
    /// leave it `None`, as does GitHub while it is still computing.
    pub mergeable: Option<bool>,
}

impl PullRequestData {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

/// A repository an installation can see, with the branch its config is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub repo: RepoId,
    pub default_branch: String,
}

/// A commit on a pull request, reduced to what the commit checks need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitData {
    pub sha: Sha,
    pub message: String,

    /// `commit.verification.verified` from the API.
    pub verified: bool,
}

/// An existing check run attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunData {
    pub id: CheckRunId,
    pub name: String,
    pub head_sha: Sha,
}

/// Terminal conclusion of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    ActionRequired,
}

impl CheckConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckConclusion::Success => "success",
            CheckConclusion::Failure => "failure",
            CheckConclusion::ActionRequired => "action_required",
        }
    }
}

/// The title/summary/text block shown on a check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    pub text: String,
}

impl CheckRunOutput {
    pub fn new(title: &str, summary: &str, text: &str) -> Self {
        CheckRunOutput {
            title: title.to_string(),
            summary: summary.to_string(),
            text: text.to_string(),
        }
    }
}

/// The event type of a submitted pull request review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    Comment,
    Approve,
}

/// Merge strategy for the merge endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMethod {
    Merge,
    Squash,
    Rebase,
}
