//! Random cat, dog and gif lookups for the fun slash-commands.
//!
//! [`MediaOps`] is the seam the command dispatcher uses; [`MediaClient`] is
//! the reqwest-backed implementation talking to thecatapi, thedogapi and Giphy.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const DEFAULT_CAT_URL: &str = "https://api.thecatapi.com/v1/images/search";
const DEFAULT_DOG_URL: &str = "https://api.thedogapi.com/v1/images/search";
const DEFAULT_GIPHY_URL: &str = "https://api.giphy.com/v1/gifs/random";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no {0} returned by the API")]
    Empty(&'static str),
}

/// Looks up image URLs to embed in comments.
pub trait MediaOps: Send + Sync {
    fn random_cat(&self) -> impl Future<Output = Result<String, MediaError>> + Send;

    fn random_dog(&self) -> impl Future<Output = Result<String, MediaError>> + Send;

    /// A random gif tagged with `query`.
    fn random_gif(&self, query: &str) -> impl Future<Output = Result<String, MediaError>> + Send;
}

/// Endpoints and credentials for [`MediaClient`].
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub cat_url: String,
    pub dog_url: String,
    pub giphy_url: String,
    pub giphy_api_key: String,
    pub timeout: Duration,
}

impl MediaConfig {
    pub fn new(giphy_api_key: impl Into<String>) -> Self {
        MediaConfig {
            cat_url: DEFAULT_CAT_URL.to_string(),
            dog_url: DEFAULT_DOG_URL.to_string(),
            giphy_url: DEFAULT_GIPHY_URL.to_string(),
            giphy_api_key: giphy_api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Animal {
    url: String,
}

#[derive(Clone)]
pub struct MediaClient {
    config: MediaConfig,
    http: reqwest::Client,
}

impl MediaClient {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("paul/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    async fn random_animal(&self, url: &str, kind: &'static str) -> Result<String, MediaError> {
        let animals: Vec<Animal> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let animal = animals.into_iter().next().ok_or(MediaError::Empty(kind))?;
        debug!(kind, url = %animal.url, "Fetched random image");
        Ok(animal.url)
    }
}

impl std::fmt::Debug for MediaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaClient")
            .field("cat_url", &self.config.cat_url)
            .field("dog_url", &self.config.dog_url)
            .field("giphy_url", &self.config.giphy_url)
            .finish_non_exhaustive()
    }
}

/// Extracts `data.images.fixed_height.url` from a Giphy random response.
///
/// Giphy answers a tag with no matches with `"data": []`.
fn giphy_url(response: &serde_json::Value) -> Option<String> {
    response
        .pointer("/data/images/fixed_height/url")
        .and_then(|u| u.as_str())
        .map(str::to_string)
}

impl MediaOps for MediaClient {
    async fn random_cat(&self) -> Result<String, MediaError> {
        self.random_animal(&self.config.cat_url, "cat").await
    }

    async fn random_dog(&self) -> Result<String, MediaError> {
        self.random_animal(&self.config.dog_url, "dog").await
    }

    async fn random_gif(&self, query: &str) -> Result<String, MediaError> {
        let response: serde_json::Value = self
            .http
            .get(&self.config.giphy_url)
            .query(&[
                ("api_key", self.config.giphy_api_key.as_str()),
                ("tag", query),
                ("rating", "g"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let url = giphy_url(&response).ok_or(MediaError::Empty("gif"))?;
        debug!(query, url = %url, "Fetched random gif");
        Ok(url)
    }
}
