//! Repository policy configuration.
//!
//! The policy lives in `PAUL.yaml`, read from the repository's default branch.
//! `.github/PAUL.yaml` is tried first, then the repository root.
//!
//! [`resolve_config`] reports a missing or unreadable file as an error.
//! Everything downstream goes through [`resolve_or_default`], which logs the
//! problem and falls back to the no-op policy.

mod policy;

use thiserror::Error;
use tracing::{debug, warn};

use crate::github::{ContentOps, GitHubApiError};
use crate::types::RepoId;

pub use policy::{
    BranchDestroyerPolicy, EmptyDescriptionPolicy, LimitPolicy, PolicyConfig, PullRequestPolicy,
};

/// Locations searched for the policy file, in order.
pub const CONFIG_PATHS: [&str; 2] = [".github/PAUL.yaml", "PAUL.yaml"];

/// Errors from loading a repository's policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no PAUL.yaml found in {repo} at {git_ref}")]
    NotFound { repo: RepoId, git_ref: String },

    #[error("invalid PAUL.yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to fetch PAUL.yaml: {0}")]
    GitHub(#[from] GitHubApiError),
}

/// Fetches and parses the policy file for `repo` at `default_branch`.
pub async fn resolve_config<C: ContentOps>(
    client: &C,
    repo: &RepoId,
    default_branch: &str,
) -> Result<PolicyConfig, ConfigError> {
    for path in CONFIG_PATHS {
        if let Some(bytes) = client.get_file(path, default_branch).await? {
            debug!(repo = %repo, path, "Loaded policy file");
            return PolicyConfig::from_yaml(&bytes);
        }
    }
    Err(ConfigError::NotFound {
        repo: repo.clone(),
        git_ref: default_branch.to_string(),
    })
}

/// Like [`resolve_config`], but any failure yields the no-op policy.
pub async fn resolve_or_default<C: ContentOps>(
    client: &C,
    repo: &RepoId,
    default_branch: &str,
) -> PolicyConfig {
    match resolve_config(client, repo, default_branch).await {
        Ok(config) => config,
        Err(ConfigError::NotFound { .. }) => {
            debug!(repo = %repo, "No policy file, nothing enabled");
            PolicyConfig::default()
        }
        Err(e) => {
            warn!(repo = %repo, error = %e, "Could not load policy, nothing enabled");
            PolicyConfig::default()
        }
    }
}
