use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use super::{TokenPair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Persistent storage for the token pair of one origin.
///
/// Implementations only guard their own internal state. Two handlers that
/// touch the store at the same time (a refresh racing a logout, say) are not
/// coordinated and the last write wins.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Result<Option<String>>;

    fn refresh_token(&self) -> Result<Option<String>>;

    /// Overwrite both entries.
    fn set(&self, pair: &TokenPair) -> Result<()>;

    /// Remove both entries. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    /// The stored pair, if an access token is present.
    fn get(&self) -> Result<Option<TokenPair>> {
        let Some(access_token) = self.access_token()? else {
            return Ok(None);
        };
        let refresh_token = self.refresh_token()?.unwrap_or_default();
        Ok(Some(TokenPair {
            access_token,
            refresh_token,
        }))
    }
}

/// In-process store. Backs the `memory` backend and the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(pair: &TokenPair) -> Self {
        let store = Self::new();
        store.write(|entries| {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone());
        });
        store
    }

    fn read(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn write(&self, f: impl FnOnce(&mut HashMap<String, String>)) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut entries);
    }

    /// Set a single entry, leaving the other untouched.
    pub fn set_entry(&self, key: &str, value: &str) {
        self.write(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }
}

impl TokenStore for MemoryStore {
    fn access_token(&self) -> Result<Option<String>> {
        Ok(self.read(ACCESS_TOKEN_KEY))
    }

    fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self.read(REFRESH_TOKEN_KEY))
    }

    fn set(&self, pair: &TokenPair) -> Result<()> {
        self.write(|entries| {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone());
            entries.insert(REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone());
        });
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.write(|entries| {
            entries.remove(ACCESS_TOKEN_KEY);
            entries.remove(REFRESH_TOKEN_KEY);
        });
        Ok(())
    }
}
