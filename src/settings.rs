//! Process settings read from the environment.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `SERVER_HOST` | bind host | `127.0.0.1` |
//! | `SERVER_PORT` | bind port | `8000` |
//! | `SECRET_KEY` | webhook secret | first line of `$SECRET_PATH/paul-secret-key` |
//! | `APPLICATION_ID` | GitHub App id | required |
//! | `PRIVATE_KEY` | App private key (PEM) | `$SECRET_PATH/paul-private-key` |
//! | `PERSONAL_ACCESS_TOKEN` | replaces installation tokens | unset |
//! | `GIPHY_API_KEY` | Giphy key for `/gif` | empty |

use std::path::{Path, PathBuf};

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

const SECRET_KEY_FILE: &str = "paul-secret-key";
const PRIVATE_KEY_FILE: &str = "paul-private-key";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything the binary needs to start.
#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub webhook_secret: Vec<u8>,
    pub application_id: u64,
    pub private_key: String,
    pub personal_access_token: Option<String>,
    pub giphy_api_key: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("application_id", &self.application_id)
            .field("personal_access_token", &self.personal_access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let secret_path = var("SECRET_PATH").map(PathBuf::from);

        let webhook_secret = match var("SECRET_KEY") {
            Some(secret) => secret,
            None => {
                let dir = secret_path.as_deref().ok_or(SettingsError::Missing("SECRET_KEY"))?;
                first_line(&read(&dir.join(SECRET_KEY_FILE))?).to_string()
            }
        };

        let private_key = match var("PRIVATE_KEY") {
            Some(key) => key,
            None => {
                let dir = secret_path.as_deref().ok_or(SettingsError::Missing("PRIVATE_KEY"))?;
                read(&dir.join(PRIVATE_KEY_FILE))?
            }
        };

        let application_id = var("APPLICATION_ID").ok_or(SettingsError::Missing("APPLICATION_ID"))?;
        let application_id = application_id
            .trim()
            .parse::<u64>()
            .map_err(|_| SettingsError::Invalid {
                name: "APPLICATION_ID",
                value: application_id.clone(),
            })?;

        let port = match var("SERVER_PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|_| SettingsError::Invalid {
                name: "SERVER_PORT",
                value: port.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Settings {
            host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            webhook_secret: webhook_secret.into_bytes(),
            application_id,
            private_key,
            personal_access_token: var("PERSONAL_ACCESS_TOKEN"),
            giphy_api_key: var("GIPHY_API_KEY").unwrap_or_default(),
        })
    }

    /// Where to listen. The host may be a name such as `localhost`; it is
    /// resolved when binding.
    pub fn bind_target(&self) -> (&str, u16) {
        (&self.host, self.port)
    }
}

fn read(path: &Path) -> Result<String, SettingsError> {
    std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn first_line(contents: &str) -> &str {
    contents.lines().next().unwrap_or_default()
}
