//! Octocrab client wrapper scoped to a specific repository.
//!
//! `GitHubClient` wraps an installation-authenticated `Octocrab` and scopes
//! all operations to one repository, matching the capability traits in
//! [`ops`](super::ops), none of which take repository coordinates.
//!
//! Every call made through the client races the client's cancellation token.
//! A webhook client carries a child of the request token; a sweep client
//! carries the sweep token.

use std::future::Future;

use octocrab::Octocrab;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::types::RepoId;

use super::error::{GitHubApiError, GitHubErrorKind};

/// A GitHub API client scoped to a specific repository.
#[derive(Clone)]
pub struct GitHubClient {
    client: Octocrab,
    repo: RepoId,
    cancel: CancellationToken,
}

impl GitHubClient {
    pub fn new(client: Octocrab, repo: RepoId, cancel: CancellationToken) -> Self {
        Self {
            client,
            repo,
            cancel,
        }
    }

    pub fn inner(&self) -> &Octocrab {
        &self.client
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn owner(&self) -> &str {
        &self.repo.owner
    }

    pub fn repo_name(&self) -> &str {
        &self.repo.repo
    }

    /// `/repos/{owner}/{repo}` followed by `suffix`.
    pub(crate) fn repo_url(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{}", self.owner(), self.repo_name(), suffix)
    }

    /// Runs an octocrab call unless the client's token fires first.
    pub(crate) async fn guard<T, F>(&self, call: F) -> Result<T, GitHubApiError>
    where
        F: Future<Output = Result<T, octocrab::Error>>,
    {
        guarded(&self.cancel, call).await.inspect_err(|e| {
            if e.kind == GitHubErrorKind::Cancelled {
                debug!(repo = %self.repo, "GitHub call cancelled");
            }
        })
    }
}

/// Races an octocrab call against `cancel`.
pub(crate) async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> Result<T, GitHubApiError>
where
    F: Future<Output = Result<T, octocrab::Error>>,
{
    tokio::select! {
        biased;

        _ = cancel.cancelled() => Err(GitHubApiError::cancelled()),
        result = call => result.map_err(GitHubApiError::from_octocrab),
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}
