//! Application configuration management.
//!
//! This module handles loading and saving the configuration: which service to
//! talk to, where tokens are kept, and the last username that logged in.
//!
//! Configuration is stored at `~/.config/authsession/config.json`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::AuthClient;
use crate::auth::{origin_of, FileStore, KeyringStore, MemoryStore, TokenStore};

/// Application name used for config/data directory paths
const APP_NAME: &str = "authsession";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Service the client talks to when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

pub const BASE_URL_ENV: &str = "AUTHSESSION_BASE_URL";
pub const STORE_ENV: &str = "AUTHSESSION_STORE";

/// Where the token pair is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "keyring" => Ok(StoreBackend::Keyring),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!(
                "unknown token store '{}' (expected file, keyring or memory)",
                other
            )),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreBackend::File => "file",
            StoreBackend::Keyring => "keyring",
            StoreBackend::Memory => "memory",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub store: StoreBackend,
    pub request_timeout_secs: Option<u64>,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            store: StoreBackend::default(),
            request_timeout_secs: None,
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Record the last username that logged in.
    ///
    /// The file is re-read so that environment and command line overrides
    /// applied to the in-memory config never reach disk. A file that cannot
    /// be parsed is left untouched.
    pub fn remember_username(username: &str) -> Result<()> {
        Self::remember_username_at(&Self::config_path()?, username)
    }

    fn remember_username_at(path: &Path, username: &str) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        if stored.last_username.as_deref() == Some(username) {
            return Ok(());
        }
        stored.last_username = Some(username.to_string());
        stored.save_to(path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Ok(serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?)
        } else {
            Ok(Self::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Root directory for the file token store.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Apply overrides from a lookup function (normally the process
    /// environment). Unset or empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(store) = lookup(STORE_ENV).filter(|v| !v.trim().is_empty()) {
            self.store = store
                .parse()
                .with_context(|| format!("Invalid {}", STORE_ENV))?;
        }
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn parsed_base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid base URL: {}", self.base_url))
    }

    /// Origin that scopes the stored tokens.
    pub fn origin(&self) -> Result<String> {
        Ok(origin_of(&self.parsed_base_url()?))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn client(&self) -> Result<AuthClient> {
        Ok(AuthClient::with_timeout(&self.base_url, self.request_timeout())?)
    }

    /// Build the configured token store for this service's origin.
    pub fn open_store(&self) -> Result<Arc<dyn TokenStore>> {
        let origin = self.origin()?;
        let store: Arc<dyn TokenStore> = match self.store {
            StoreBackend::File => Arc::new(FileStore::new(&self.data_dir()?, &origin)),
            StoreBackend::Keyring => Arc::new(KeyringStore::new(&origin)),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(store)
    }
}
