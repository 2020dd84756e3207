//! App- and installation-level clients.
//!
//! `GitHubApp` holds a JWT-authenticated octocrab instance for the app and
//! hands out [`GitHubInstallation`]s, which in turn hand out repository-scoped
//! [`GitHubClient`]s. When a personal access token is configured it replaces
//! the installation token for every installation client.

use jsonwebtoken::EncodingKey;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::types::{InstallationId, RepoId, RepositoryRef};

use super::client::{GitHubClient, guarded};
use super::error::GitHubApiError;
use super::ops::{AppOps, InstallationOps};

/// Errors raised while building the app client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid RSA private key: {0}")]
    InvalidPrivateKey(#[from] jsonwebtoken::errors::Error),

    #[error("failed to build GitHub client: {0}")]
    Client(#[from] octocrab::Error),
}

/// The GitHub App, authenticated as itself.
#[derive(Clone)]
pub struct GitHubApp {
    app: Octocrab,
    personal: Option<Octocrab>,
}

impl GitHubApp {
    /// Builds the app client from its id and PEM-encoded private key.
    pub fn new(
        app_id: u64,
        private_key_pem: &str,
        personal_token: Option<String>,
    ) -> Result<Self, AuthError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
        let app = Octocrab::builder()
            .app(octocrab::models::AppId(app_id), key)
            .build()?;

        let personal = match personal_token {
            Some(token) => {
                info!("Using personal access token for installation clients");
                Some(Octocrab::builder().personal_token(token).build()?)
            }
            None => None,
        };

        Ok(Self { app, personal })
    }
}

#[derive(Debug, Deserialize)]
struct RawInstallation {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RawInstallationRepositories {
    repositories: Vec<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    owner: RawOwner,
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

#[derive(Debug, Serialize)]
struct Page {
    per_page: u32,
    page: u32,
}

impl AppOps for GitHubApp {
    type Installation = GitHubInstallation;

    async fn list_installations(
        &self,
        page_size: u8,
    ) -> Result<Vec<InstallationId>, GitHubApiError> {
        let per_page = u32::from(page_size.max(1));
        let mut installations = Vec::new();
        let mut page = 1;
        loop {
            let query = Page { per_page, page };
            let batch: Vec<RawInstallation> = self
                .app
                .get("/app/installations", Some(&query))
                .await
                .map_err(GitHubApiError::from_octocrab)?;
            let last = batch.len() < per_page as usize;
            installations.extend(batch.into_iter().map(|i| InstallationId(i.id)));
            if last {
                break;
            }
            page += 1;
        }
        debug!(count = installations.len(), "Listed installations");
        Ok(installations)
    }

    fn installation(
        &self,
        id: InstallationId,
        cancel: CancellationToken,
    ) -> Result<GitHubInstallation, GitHubApiError> {
        let client = match &self.personal {
            Some(personal) => personal.clone(),
            None => self
                .app
                .installation(octocrab::models::InstallationId(id.0))
                .map_err(GitHubApiError::from_octocrab)?,
        };
        Ok(GitHubInstallation { id, client, cancel })
    }
}

/// A single installation of the app.
#[derive(Clone)]
pub struct GitHubInstallation {
    id: InstallationId,
    client: Octocrab,
    cancel: CancellationToken,
}

impl std::fmt::Debug for GitHubInstallation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubInstallation")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl InstallationOps for GitHubInstallation {
    type Client = GitHubClient;

    async fn list_repositories(&self, limit: usize) -> Result<Vec<RepositoryRef>, GitHubApiError> {
        let per_page = limit.clamp(1, 100) as u32;
        let mut repositories = Vec::new();
        let mut page = 1;
        while repositories.len() < limit {
            let query = Page { per_page, page };
            let batch: RawInstallationRepositories = guarded(
                &self.cancel,
                self.client.get("/installation/repositories", Some(&query)),
            )
            .await?;
            let last = batch.repositories.len() < per_page as usize;
            repositories.extend(batch.repositories.into_iter().map(|r| RepositoryRef {
                repo: RepoId::new(r.owner.login, r.name),
                default_branch: r.default_branch.unwrap_or_else(|| "main".to_string()),
            }));
            if last {
                break;
            }
            page += 1;
        }
        repositories.truncate(limit);
        debug!(installation = %self.id, count = repositories.len(), "Listed repositories");
        Ok(repositories)
    }

    fn repo_client(&self, repo: &RepoId) -> GitHubClient {
        GitHubClient::new(self.client.clone(), repo.clone(), self.cancel.clone())
    }
}
