use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::{origin_slug, TokenPair, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Token file name inside the per-origin directory
const TOKEN_FILE: &str = "tokens.json";

/// Token pair persisted as a flat JSON object of `authToken`/`refreshToken`
/// entries, one file per origin.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store for `origin` under `root` (`<root>/<origin-slug>/tokens.json`).
    pub fn new(root: &Path, origin: &str) -> Self {
        Self {
            path: root.join(origin_slug(origin)).join(TOKEN_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file: {}", self.path.display()))?;
        let entries = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token file: {}", self.path.display()))?;
        Ok(entries)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write token file: {}", self.path.display()))?;
        Ok(())
    }
}

impl TokenStore for FileStore {
    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.load()?.remove(ACCESS_TOKEN_KEY))
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.load()?.remove(REFRESH_TOKEN_KEY))
    }

    fn set(&self, pair: &TokenPair) -> Result<()> {
        let mut entries = self.load().unwrap_or_default();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone());
        self.save(&entries)?;
        debug!(path = %self.path.display(), "Token file written");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file: {}", self.path.display()))?;
            debug!(path = %self.path.display(), "Token file removed");
        }
        Ok(())
    }
}
