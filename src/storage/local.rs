//! Local directory backend

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{BlobStore, StoreError};

/// Stores each document as a file under a data directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the data directory if it does not exist yet
    pub async fn ensure_root(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", self.root.display())))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl BlobStore for LocalStore {
    async fn read(&self, key: &str) -> Result<String, StoreError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!(path = %path.display(), bytes = contents.len(), "Read document");
                Ok(contents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(StoreError::Io(format!("{}: {e}", path.display()))),
        }
    }

    async fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote document");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
