//! Durable storage for the session token.
//!
//! The browser build kept the token in origin-scoped local storage; here it
//! is one small JSON file under the shell's data directory. The trait seam
//! exists so tests and alternative shells can swap the backing store.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persist/read/clear exactly one opaque credential string.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CredentialFile {
    token: Option<String>,
}

pub struct FileCredentialStore {
    path: PathBuf,
    data: RwLock<CredentialFile>,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            // A corrupt file is treated as an absent credential rather than
            // a startup failure.
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            CredentialFile::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn persist(&self, data: &CredentialFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.data.read().unwrap().token.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.token = Some(token.to_string());
        self.persist(&guard)
    }

    fn remove(&self) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.token = None;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
