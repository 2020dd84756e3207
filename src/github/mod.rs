//! GitHub API access.
//!
//! - [`ops`]: the capability traits the policy engine is written against
//! - [`GitHubClient`]: octocrab-backed, repository-scoped implementation
//! - [`GitHubApp`] / [`GitHubInstallation`]: credential issuance
//!
//! Calls are made once; failures surface as [`GitHubApiError`] and are either
//! returned to the webhook caller or logged by the sweep.

mod app;
mod client;
mod error;
pub mod ops;
mod rest;

pub use app::{AuthError, GitHubApp, GitHubInstallation};
pub use client::GitHubClient;
pub use error::{GitHubApiError, GitHubErrorKind};
pub use ops::{
    AppOps, ChecksOps, ContentOps, GitHubOps, GitOps, InstallationOps, IssueOps, PullRequestOps,
};
