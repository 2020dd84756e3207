//! Merging pull requests GitHub reports as mergeable.

use tracing::{debug, info};

use crate::github::{GitHubApiError, PullRequestOps};
use crate::messages::MERGE_LABEL;
use crate::types::{MergeMethod, PrNumber, PullRequestData};

/// Outcome of a merge attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged,

    /// GitHub says the PR cannot be merged, or has not decided yet.
    NotMergeable,
}

/// PRs opted into the automated merge sweep.
pub fn merge_candidates(prs: &[PullRequestData]) -> impl Iterator<Item = &PullRequestData> {
    prs.iter()
        .filter(|pr| pr.state.is_open() && pr.has_label(MERGE_LABEL))
}

/// Re-fetches `number` and merges it with the merge-commit strategy if
/// GitHub reports it mergeable.
///
/// List responses never carry `mergeable`, so the PR is always fetched
/// individually first. An unknown verdict counts as not mergeable.
pub async fn merge_if_mergeable<C: PullRequestOps>(
    client: &C,
    number: PrNumber,
) -> Result<MergeOutcome, GitHubApiError> {
    let pr = client.get_pull_request(number).await?;
    if pr.mergeable != Some(true) {
        debug!(pr = %number, mergeable = ?pr.mergeable, "Not mergeable");
        return Ok(MergeOutcome::NotMergeable);
    }

    client.merge_pull_request(number, MergeMethod::Merge).await?;
    info!(pr = %number, "Merged pull request");
    Ok(MergeOutcome::Merged)
}
