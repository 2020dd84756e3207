//! Handler for `pull_request` events.
//!
//! Runs the pull request policies in a fixed order:
//!
//! 1. branch destroyer
//! 2. welcome message
//! 3. empty description check
//! 4. open-PR limit
//! 5. verified commits check
//! 6. DCO check
//!
//! Each is gated by its own config section only. They run one after another,
//! and the first failure aborts the rest.

use tracing::{debug, instrument};

use crate::checks::{branch_destroyer, dco, description, limit, verified, welcome};
use crate::config::PolicyConfig;
use crate::github::GitHubOps;
use crate::webhooks::PullRequestEvent;

use super::HandlerError;

/// What the pipeline did for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub branch_deleted: bool,
    pub welcomed: bool,
    pub description_flagged: bool,
    pub closed_over_limit: bool,

    /// Verified-commits verdict, if the check ran.
    pub verified: Option<bool>,

    /// DCO verdict, if the check ran.
    pub dco: Option<bool>,
}

/// Runs the pull request pipeline for `event`.
#[instrument(skip_all, fields(repo = %event.repo, pr = %event.number(), action = ?event.action))]
pub async fn handle_pull_request<C: GitHubOps>(
    client: &C,
    config: &PolicyConfig,
    event: &PullRequestEvent,
) -> Result<PipelineReport, HandlerError> {
    let prs = &config.pull_requests;
    let mut report = PipelineReport {
        branch_deleted: branch_destroyer::destroy_branch(client, &config.branch_destroyer, event)
            .await?,
        ..PipelineReport::default()
    };

    report.welcomed = welcome::welcome(client, config, event).await?;
    report.description_flagged =
        description::check_description(client, &config.empty_description_check, event).await?;
    report.closed_over_limit =
        limit::enforce_limit(client, &prs.limit_pull_requests, event).await?;

    if prs.verified_commit_check {
        report.verified =
            Some(verified::run_verified_check(client, &event.pull_request).await?);
    }
    if prs.dco_check {
        report.dco = Some(dco::run_dco_check(client, &event.pull_request).await?);
    }

    debug!(?report, "Pull request pipeline finished");
    Ok(report)
}
