// src/core/token_store.rs
//! Persistent storage for the bearer token

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};

pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Token kept as `token = "..."` in a TOML file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::io(self.display(), e)),
        };

        match toml::from_str::<TokenFile>(&content) {
            Ok(file) if !file.token.trim().is_empty() => Ok(Some(file.token)),
            Ok(_) => Ok(None),
            Err(e) => {
                // A corrupt file is treated like an absent session
                warn!("Ignoring unreadable token file {}: {}", self.display(), e);
                Ok(None)
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ApiError::io(parent.display().to_string(), e))?;
            }
        }

        let content = toml::to_string(&TokenFile {
            token: token.to_string(),
        })
        .map_err(|e| ApiError::Config(format!("Failed to serialize token file: {}", e)))?;

        std::fs::write(&self.path, content).map_err(|e| ApiError::io(self.display(), e))?;
        debug!("Stored session token in {}", self.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session token {}", self.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::io(self.display(), e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .read()
            .map_err(|_| ApiError::Config("token store lock poisoned".to_string()))?
            .clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self
            .token
            .write()
            .map_err(|_| ApiError::Config("token store lock poisoned".to_string()))? =
            Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self
            .token
            .write()
            .map_err(|_| ApiError::Config("token store lock poisoned".to_string()))? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.toml"));

        assert_eq!(store.get().unwrap(), None);
        store.set("abc.def.ghi").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.path().exists());

        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let store = FileTokenStore::new(path);
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("t1");
        assert_eq!(store.get().unwrap().as_deref(), Some("t1"));
        store.set("t2").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("t2"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
