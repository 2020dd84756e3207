//! Policy primitives.
//!
//! Each check decides from a [`PolicyConfig`](crate::config::PolicyConfig)
//! section and an event (or a PR snapshot) whether it applies, and if so
//! performs its GitHub side effect through the capability traits. The
//! decisions are plain functions so they can be tested without a client.
//!
//! | Check | Trigger | Effect |
//! |---|---|---|
//! | [`branch_destroyer`] | merged PR closed | delete head branch |
//! | [`welcome`] | PR opened by a non-maintainer | review comment |
//! | [`description`] | PR opened with empty body | review comment, maybe close |
//! | [`limit`] | author over open-PR limit | close and comment |
//! | [`verified`] | any PR event | `VerifiedCommits` check run |
//! | [`dco`] | any PR event | `DeveloperCertificateOfOrigin` check run |
//! | [`stale`] | sweep | `stale` label |
//! | [`merge`] | sweep, `/merge` | merge if mergeable |

pub mod branch_destroyer;
pub mod check_run;
pub mod dco;
pub mod description;
pub mod limit;
pub mod merge;
pub mod stale;
pub mod verified;
pub mod welcome;

use thiserror::Error;

use crate::github::GitHubApiError;
use crate::types::Sha;

pub use check_run::{CommitCheck, ensure_check_run, run_commit_check};

/// Errors from running a check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    GitHub(#[from] GitHubApiError),

    /// More than one check run with the same name exists on a commit.
    #[error("found {count} '{name}' check runs on {sha}, expected at most one")]
    DuplicateCheckRuns { name: String, sha: Sha, count: usize },
}
