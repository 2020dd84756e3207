//! Requires every commit on a pull request to carry a verified signature.

use crate::github::{ChecksOps, PullRequestOps};
use crate::messages::verified;
use crate::types::{CheckConclusion, CheckRunOutput, CommitData, PullRequestData};

use super::{CheckError, CommitCheck, run_commit_check};

pub fn all_verified(commits: &[CommitData]) -> bool {
    commits.iter().all(|c| c.verified)
}

pub fn verified_check() -> CommitCheck {
    CommitCheck {
        name: verified::CHECK_NAME,
        pending: CheckRunOutput::new(
            verified::PENDING_TITLE,
            verified::PENDING_SUMMARY,
            verified::PENDING_TEXT,
        ),
        success: CheckRunOutput::new(
            verified::SUCCESS_TITLE,
            verified::SUCCESS_SUMMARY,
            verified::SUCCESS_TEXT,
        ),
        failure: CheckRunOutput::new(
            verified::FAILURE_TITLE,
            verified::FAILURE_SUMMARY,
            verified::FAILURE_TEXT,
        ),
        failure_conclusion: CheckConclusion::Failure,
        verdict: all_verified,
    }
}

pub async fn run_verified_check<C: ChecksOps + PullRequestOps>(
    client: &C,
    pr: &PullRequestData,
) -> Result<bool, CheckError> {
    run_commit_check(client, pr, &verified_check()).await
}
