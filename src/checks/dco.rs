//! Developer Certificate of Origin check.
//!
//! Every commit on the PR must carry a `Signed-off-by:` trailer, and the
//! signer must not be an anonymous GitHub `noreply` address.

use crate::github::{ChecksOps, PullRequestOps};
use crate::messages::dco;
use crate::types::{CheckConclusion, CheckRunOutput, CommitData, PullRequestData};

use super::{CheckError, CommitCheck, run_commit_check};

const SIGN_OFF: &str = "Signed-off-by:";
const NOREPLY_DOMAIN: &str = "noreply.github.com";

/// Whether `message` has a line starting with `Signed-off-by:`.
pub fn is_signed_off(message: &str) -> bool {
    message
        .lines()
        .any(|line| line.trim_start().starts_with(SIGN_OFF))
}

/// Whether any sign-off in `message` uses a GitHub `noreply` address.
pub fn is_anonymous_sign_off(message: &str) -> bool {
    message.lines().any(|line| {
        line.find(SIGN_OFF)
            .is_some_and(|at| line[at + SIGN_OFF.len()..].contains(NOREPLY_DOMAIN))
    })
}

/// True when every commit is signed off by a non-anonymous signer.
pub fn dco_verdict(commits: &[CommitData]) -> bool {
    commits
        .iter()
        .all(|c| is_signed_off(&c.message) && !is_anonymous_sign_off(&c.message))
}

pub fn dco_check() -> CommitCheck {
    CommitCheck {
        name: dco::CHECK_NAME,
        pending: CheckRunOutput::new(dco::PENDING_TITLE, dco::PENDING_SUMMARY, dco::PENDING_TEXT),
        success: CheckRunOutput::new(dco::SUCCESS_TITLE, dco::SUCCESS_SUMMARY, dco::SUCCESS_TEXT),
        failure: CheckRunOutput::new(dco::FAILURE_TITLE, dco::FAILURE_SUMMARY, dco::FAILURE_TEXT),
        failure_conclusion: CheckConclusion::ActionRequired,
        verdict: dco_verdict,
    }
}

/// Runs the DCO check on `pr` and reports the result as a check run.
pub async fn run_dco_check<C: ChecksOps + PullRequestOps>(
    client: &C,
    pr: &PullRequestData,
) -> Result<bool, CheckError> {
    run_commit_check(client, pr, &dco_check()).await
}
