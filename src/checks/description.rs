//! Flags pull requests opened without a description.

use tracing::info;

use crate::config::EmptyDescriptionPolicy;
use crate::github::{GitHubApiError, PullRequestOps};
use crate::types::ReviewEvent;
use crate::webhooks::{PrAction, PullRequestEvent};

/// Whether `event` is a PR opened with an empty (or all-whitespace) body.
pub fn lacks_description(policy: &EmptyDescriptionPolicy, event: &PullRequestEvent) -> bool {
    policy.enabled
        && event.action == PrAction::Opened
        && event.pull_request.body.trim().is_empty()
}

/// Comments on a PR with no description, closing it when the policy is
/// enforced. Returns whether the PR was flagged.
pub async fn check_description<C: PullRequestOps>(
    client: &C,
    policy: &EmptyDescriptionPolicy,
    event: &PullRequestEvent,
) -> Result<bool, GitHubApiError> {
    if !lacks_description(policy, event) {
        return Ok(false);
    }

    let number = event.number();
    client
        .create_review(number, ReviewEvent::Comment, Some(policy.message()))
        .await?;

    if policy.enforced {
        client.close_pull_request(number).await?;
        info!(repo = %event.repo, pr = %number, "Closed PR with empty description");
    } else {
        info!(repo = %event.repo, pr = %number, "Flagged PR with empty description");
    }
    Ok(true)
}
