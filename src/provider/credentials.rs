//! Datastream account credentials, sourced from the environment or a secret file.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config;
use crate::error::{DashboardError, Result};

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read `DSWS_USERNAME` / `DSWS_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        let username = read_env(config::ENV_USERNAME)?;
        let password = read_env(config::ENV_PASSWORD)?;
        Ok(Self { username, password })
    }

    /// Read a JSON file of the form `{"username": "...", "password": "..."}`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let creds: Credentials = serde_json::from_str(&contents)?;
        if creds.username.trim().is_empty() || creds.password.is_empty() {
            return Err(DashboardError::Auth(format!(
                "Credentials file {} has an empty username or password",
                path.as_ref().display()
            )));
        }
        Ok(creds)
    }

    /// Environment first, then the per-user credentials file.
    pub fn resolve() -> Result<Self> {
        if let Ok(creds) = Self::from_env() {
            return Ok(creds);
        }
        let path = config::default_credentials_path();
        if path.exists() {
            tracing::debug!(path = %path.display(), "reading Datastream credentials file");
            return Self::from_file(&path);
        }
        Err(DashboardError::Auth(format!(
            "No Datastream credentials: set {} and {} or create {}",
            config::ENV_USERNAME,
            config::ENV_PASSWORD,
            path.display()
        )))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn read_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(DashboardError::Auth(format!("{} is not set", name))),
    }
}
