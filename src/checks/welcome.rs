//! Greets contributors who open a pull request.

use tracing::info;

use crate::config::PolicyConfig;
use crate::github::{GitHubApiError, PullRequestOps};
use crate::types::ReviewEvent;
use crate::webhooks::{PrAction, PullRequestEvent};

/// Whether `event` should get the configured welcome message.
pub fn should_welcome(config: &PolicyConfig, event: &PullRequestEvent) -> bool {
    !config.pull_requests.open_message.is_empty()
        && event.action == PrAction::Opened
        && !config.is_maintainer(&event.pull_request.author)
}

/// Posts the welcome message as a review comment. Returns whether it did.
pub async fn welcome<C: PullRequestOps>(
    client: &C,
    config: &PolicyConfig,
    event: &PullRequestEvent,
) -> Result<bool, GitHubApiError> {
    if !should_welcome(config, event) {
        return Ok(false);
    }

    client
        .create_review(
            event.number(),
            ReviewEvent::Comment,
            Some(&config.pull_requests.open_message),
        )
        .await?;
    info!(repo = %event.repo, pr = %event.number(), "Welcomed contributor");
    Ok(true)
}
