//! Capability traits for talking to GitHub.
//!
//! The policy engine never holds an `Octocrab` directly. Handlers are generic
//! over these traits, so tests can hand them an in-memory fake and the binary
//! hands them [`GitHubClient`](super::GitHubClient).
//!
//! Repository-level traits are implemented by a value already scoped to one
//! repository: none of the methods take an owner or repo name.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::types::{
    CheckConclusion, CheckRunData, CheckRunId, CheckRunOutput, CommitData, InstallationId,
    MergeMethod, PrNumber, PullRequestData, RepoId, RepositoryRef, ReviewEvent, Sha,
};

use super::error::GitHubApiError;

/// Issue-level operations. Pull requests are issues for these endpoints.
pub trait IssueOps: Send + Sync {
    fn create_comment(
        &self,
        number: PrNumber,
        body: &str,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;

    fn add_labels(
        &self,
        number: PrNumber,
        labels: &[String],
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;

    fn remove_label(
        &self,
        number: PrNumber,
        label: &str,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;
}

/// Pull request operations.
pub trait PullRequestOps: Send + Sync {
    /// Fetches a single PR. This is the only call that populates `mergeable`.
    fn get_pull_request(
        &self,
        number: PrNumber,
    ) -> impl Future<Output = Result<PullRequestData, GitHubApiError>> + Send;

    /// Lists every open PR in the repository, following pagination.
    fn list_open_pull_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<PullRequestData>, GitHubApiError>> + Send;

    fn list_commits(
        &self,
        number: PrNumber,
    ) -> impl Future<Output = Result<Vec<CommitData>, GitHubApiError>> + Send;

    fn create_review(
        &self,
        number: PrNumber,
        event: ReviewEvent,
        body: Option<&str>,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;

    fn close_pull_request(
        &self,
        number: PrNumber,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;

    fn merge_pull_request(
        &self,
        number: PrNumber,
        method: MergeMethod,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;

    fn request_reviewers(
        &self,
        number: PrNumber,
        reviewers: &[String],
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;
}

/// Git data operations.
pub trait GitOps: Send + Sync {
    /// Deletes `refs/heads/<branch>`.
    fn delete_branch(&self, branch: &str)
    -> impl Future<Output = Result<(), GitHubApiError>> + Send;
}

/// Repository contents.
pub trait ContentOps: Send + Sync {
    /// Downloads a file at `git_ref`. A missing file is `Ok(None)`, not an error.
    fn get_file(
        &self,
        path: &str,
        git_ref: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, GitHubApiError>> + Send;
}

/// Checks API.
pub trait ChecksOps: Send + Sync {
    /// Lists check runs named `name` on `sha`.
    fn list_check_runs(
        &self,
        sha: &Sha,
        name: &str,
    ) -> impl Future<Output = Result<Vec<CheckRunData>, GitHubApiError>> + Send;

    /// Creates an `in_progress` check run and returns its id.
    fn create_check_run(
        &self,
        sha: &Sha,
        name: &str,
        output: &CheckRunOutput,
    ) -> impl Future<Output = Result<CheckRunId, GitHubApiError>> + Send;

    /// Moves a check run to `completed` with the given conclusion.
    fn complete_check_run(
        &self,
        id: CheckRunId,
        conclusion: CheckConclusion,
        output: &CheckRunOutput,
    ) -> impl Future<Output = Result<(), GitHubApiError>> + Send;
}

/// Everything a repository-scoped client can do.
pub trait GitHubOps: IssueOps + PullRequestOps + GitOps + ContentOps + ChecksOps {}

impl<T> GitHubOps for T where T: IssueOps + PullRequestOps + GitOps + ContentOps + ChecksOps {}

/// An authenticated installation of the app.
pub trait InstallationOps: Send + Sync {
    type Client: GitHubOps;

    /// Lists up to `limit` repositories the installation can access.
    fn list_repositories(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RepositoryRef>, GitHubApiError>> + Send;

    /// Returns a client scoped to `repo`, sharing this installation's credentials.
    fn repo_client(&self, repo: &RepoId) -> Self::Client;
}

/// The app itself: the root from which installation clients are issued.
pub trait AppOps: Send + Sync {
    type Installation: InstallationOps;

    fn list_installations(
        &self,
        page_size: u8,
    ) -> impl Future<Output = Result<Vec<InstallationId>, GitHubApiError>> + Send;

    /// Issues an installation client whose calls abort when `cancel` fires.
    fn installation(
        &self,
        id: InstallationId,
        cancel: CancellationToken,
    ) -> Result<Self::Installation, GitHubApiError>;
}
