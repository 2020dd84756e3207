//! Caps how many open pull requests one author may have against a branch.

use tracing::info;

use crate::config::LimitPolicy;
use crate::github::{GitHubApiError, IssueOps, PullRequestOps};
use crate::messages::limit_exceeded_comment;
use crate::types::PullRequestData;
use crate::webhooks::PullRequestEvent;

/// Counts the PRs in `open` authored by `author` against `base`.
pub fn open_count(open: &[PullRequestData], author: &str, base: &str) -> usize {
    open.iter()
        .filter(|pr| pr.state.is_open() && pr.author == author && pr.base_ref == base)
        .count()
}

/// Whether `count` open PRs is over the limit. A limit of zero is unlimited.
pub fn exceeds_limit(policy: &LimitPolicy, count: usize) -> bool {
    policy.max_number != 0 && count > policy.max_number as usize
}

/// Closes the triggering PR if its sender now has too many open against the
/// same base branch. Returns whether it was closed.
pub async fn enforce_limit<C: IssueOps + PullRequestOps>(
    client: &C,
    policy: &LimitPolicy,
    event: &PullRequestEvent,
) -> Result<bool, GitHubApiError> {
    if policy.max_number == 0 || !event.pull_request.state.is_open() {
        return Ok(false);
    }

    let open = client.list_open_pull_requests().await?;
    let count = open_count(&open, &event.sender, &event.pull_request.base_ref);
    if !exceeds_limit(policy, count) {
        return Ok(false);
    }

    let number = event.number();
    client.close_pull_request(number).await?;
    client
        .create_comment(
            number,
            &limit_exceeded_comment(&event.sender, policy.max_number),
        )
        .await?;
    info!(
        repo = %event.repo,
        pr = %number,
        author = %event.sender,
        open = count,
        max = policy.max_number,
        "Closed PR over the open-PR limit"
    );
    Ok(true)
}
