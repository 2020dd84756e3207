//! Shared lifecycle for the commit checks.
//!
//! A commit check owns one named check run per head SHA:
//!
//! ```text
//! absent ──create──▶ in_progress ──complete──▶ success | failure
//! ```
//!
//! Re-running on the same SHA reuses the existing run instead of creating a
//! second one. Finding more than one run with the same name is an error.

use tracing::{debug, info};

use crate::github::{ChecksOps, PullRequestOps};
use crate::types::{CheckConclusion, CheckRunId, CheckRunOutput, CommitData, PullRequestData, Sha};

use super::CheckError;

/// Static description of a commit check: its name, texts and verdict.
pub struct CommitCheck {
    pub name: &'static str,
    pub pending: CheckRunOutput,
    pub success: CheckRunOutput,
    pub failure: CheckRunOutput,

    /// Conclusion reported when the verdict is negative.
    pub failure_conclusion: CheckConclusion,

    /// Returns true when every commit passes.
    pub verdict: fn(&[CommitData]) -> bool,
}

/// Returns the id of the check run `name` on `sha`, creating it if absent.
pub async fn ensure_check_run<C: ChecksOps>(
    client: &C,
    sha: &Sha,
    name: &str,
    pending: &CheckRunOutput,
) -> Result<CheckRunId, CheckError> {
    let existing = client.list_check_runs(sha, name).await?;
    match existing.as_slice() {
        [] => Ok(client.create_check_run(sha, name, pending).await?),
        [run] => {
            debug!(sha = %sha.short(), name, id = %run.id, "Reusing check run");
            Ok(run.id)
        }
        runs => Err(CheckError::DuplicateCheckRuns {
            name: name.to_string(),
            sha: sha.clone(),
            count: runs.len(),
        }),
    }
}

/// Runs `check` against `pr`'s commits and completes its check run.
///
/// Returns the verdict.
pub async fn run_commit_check<C: ChecksOps + PullRequestOps>(
    client: &C,
    pr: &PullRequestData,
    check: &CommitCheck,
) -> Result<bool, CheckError> {
    let id = ensure_check_run(client, &pr.head_sha, check.name, &check.pending).await?;

    let commits = client.list_commits(pr.number).await?;
    let passed = (check.verdict)(&commits);

    let (conclusion, output) = if passed {
        (CheckConclusion::Success, &check.success)
    } else {
        (check.failure_conclusion, &check.failure)
    };
    client.complete_check_run(id, conclusion, output).await?;

    info!(
        pr = %pr.number,
        sha = %pr.head_sha.short(),
        check = check.name,
        commits = commits.len(),
        conclusion = conclusion.as_str(),
        "Completed commit check"
    );
    Ok(passed)
}
