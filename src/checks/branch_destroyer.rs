//! Deletes the head branch of a merged pull request.

use tracing::info;

use crate::config::BranchDestroyerPolicy;
use crate::github::{GitHubApiError, GitOps};
use crate::webhooks::{PrAction, PullRequestEvent};

/// Whether the head branch of `event`'s PR should be deleted.
///
/// All of these must hold:
/// - the destroyer is enabled
/// - the PR was just closed
/// - it was merged rather than abandoned
/// - the head branch lives in the base repository, not a fork
/// - the head branch is not the repository's default branch
/// - the head branch is not protected
pub fn is_branch_deletable(policy: &BranchDestroyerPolicy, event: &PullRequestEvent) -> bool {
    let head = &event.pull_request.head_ref;
    policy.enabled
        && event.action == PrAction::Closed
        && event.merged
        && event.head_repo.as_ref() == Some(&event.repo)
        && *head != event.default_branch
        && !policy.protected_branches.contains(head)
}

/// Deletes the head branch if [`is_branch_deletable`]. Returns whether it did.
pub async fn destroy_branch<C: GitOps>(
    client: &C,
    policy: &BranchDestroyerPolicy,
    event: &PullRequestEvent,
) -> Result<bool, GitHubApiError> {
    if !is_branch_deletable(policy, event) {
        return Ok(false);
    }

    let branch = &event.pull_request.head_ref;
    client.delete_branch(branch).await?;
    info!(repo = %event.repo, pr = %event.number(), branch = %branch, "Deleted merged branch");
    Ok(true)
}
