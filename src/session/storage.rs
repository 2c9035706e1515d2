// ABOUTME: Durable token storage — the backing store behind the session.
// ABOUTME: A JSON file with atomic writes for real use, and a map-backed fake for tests.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// A single-key string store for the bearer token. Absence means unauthenticated.
pub trait TokenStorage: Send {
    fn get(&self) -> anyhow::Result<Option<String>>;
    fn set(&mut self, token: &str) -> anyhow::Result<()>;
    fn remove(&mut self) -> anyhow::Result<()>;
}

/// On-disk representation of the stored token.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    saved_at: String,
}

/// Token storage backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn get(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredToken = serde_json::from_str(&content)?;
        Ok(Some(stored.token))
    }

    /// Atomic write via tmp + rename.
    fn set(&mut self, token: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            saved_at: Utc::now().to_rfc3339(),
        };
        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp_path)?;

        // Owner read/write only, set before the token is written.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(serde_json::to_string_pretty(&stored)?.as_bytes())?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn remove(&mut self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory storage keyed like a browser's local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    entries: HashMap<String, String>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with a token, as if left over from an earlier run.
    pub fn with_token(token: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        Self { entries }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn get(&self) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(TOKEN_KEY).cloned())
    }

    fn set(&mut self, token: &str) -> anyhow::Result<()> {
        self.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        Ok(())
    }

    fn remove(&mut self) -> anyhow::Result<()> {
        self.entries.remove(TOKEN_KEY);
        Ok(())
    }
}
