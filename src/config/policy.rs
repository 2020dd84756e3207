//! The per-repository policy file.
//!
//! Every field defaults to off/empty, so a partial file only enables what it
//! names and the default value is a policy that does nothing.
//!
//! ```yaml
//! maintainers:
//!   - octocat
//! labels: true
//! branch_destroyer:
//!   enabled: true
//!   protected_branches:
//!     - release
//! empty_description_check:
//!   enabled: true
//!   enforced: false
//! pull_requests:
//!   open_message: "Thanks for the PR!"
//!   allow_approval: true
//!   assign: true
//!   stale_time: 14
//!   cats_enabled: true
//!   dogs_enabled: true
//!   giphy_enabled: true
//!   automated_merge: true
//!   limit_pull_requests:
//!     max_number: 3
//!   dco_check: true
//!   verified_commit_check: false
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::messages::EMPTY_DESCRIPTION_MESSAGE;

use super::ConfigError;

/// Policy settings for a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Logins allowed to run privileged commands.
    pub maintainers: BTreeSet<String>,

    /// Enables `/label` and `/remove-label`.
    #[serde(rename = "labels", alias = "labels_enabled")]
    pub labels_enabled: bool,

    pub pull_requests: PullRequestPolicy,
    pub branch_destroyer: BranchDestroyerPolicy,
    pub empty_description_check: EmptyDescriptionPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestPolicy {
    /// Welcome message for PRs opened by non-maintainers. Empty disables it.
    pub open_message: String,

    pub allow_approval: bool,
    pub assign: bool,

    /// Days without activity before a PR is labelled stale. Zero disables it.
    #[serde(rename = "stale_time", alias = "stale_time_days")]
    pub stale_time_days: u32,

    pub cats_enabled: bool,
    pub dogs_enabled: bool,
    pub giphy_enabled: bool,
    pub automated_merge: bool,
    pub limit_pull_requests: LimitPolicy,
    pub dco_check: bool,
    pub verified_commit_check: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitPolicy {
    /// Maximum open PRs per author and base branch. Zero means unlimited.
    pub max_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchDestroyerPolicy {
    pub enabled: bool,
    pub protected_branches: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyDescriptionPolicy {
    pub enabled: bool,

    /// Close the PR as well as commenting on it.
    pub enforced: bool,

    /// Overrides the default review comment.
    pub message: Option<String>,
}

impl EmptyDescriptionPolicy {
    pub fn message(&self) -> &str {
        match self.message.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ => EMPTY_DESCRIPTION_MESSAGE,
        }
    }
}

impl PolicyConfig {
    /// Parses a `PAUL.yaml` document. An empty document is the default policy.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_slice(bytes)?)
    }

    pub fn is_maintainer(&self, login: &str) -> bool {
        self.maintainers.contains(login)
    }

    /// Whether the scheduled sweep has anything to do for this repository.
    pub fn wants_sweep(&self) -> bool {
        self.pull_requests.stale_time_days != 0 || self.pull_requests.automated_merge
    }
}
