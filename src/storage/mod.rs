//! # Blob Storage
//!
//! Key-value storage for the JSON documents, keyed by file path. Two backends
//! persist data (local directory, WebDAV server); the in-memory backend serves
//! tests and throwaway runs.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::StorageConfig;

pub mod local;
pub mod memory;
pub mod webdav;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use webdav::WebDavStore;

/// Key of the recipe catalog document
pub const RECIPES_KEY: &str = "rezepte.json";
/// Key of the to-cook list document
pub const TO_BE_COOKED_KEY: &str = "to_be_cooked.json";
/// Key of the to-buy list document
pub const TO_BE_BOUGHT_KEY: &str = "to_be_bought.json";

/// Errors raised by blob store backends
#[derive(Debug, Clone)]
pub enum StoreError {
    /// No document stored under the key
    NotFound(String),
    /// Local filesystem failure
    Io(String),
    /// Remote store answered with an error or was unreachable
    Remote(String),
    /// Document could not be (de)serialized
    Serialization(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(key) => write!(f, "Document not found: {key}"),
            StoreError::Io(msg) => write!(f, "Storage I/O error: {msg}"),
            StoreError::Remote(msg) => write!(f, "Remote storage error: {msg}"),
            StoreError::Serialization(msg) => write!(f, "Document format error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Remote(err.to_string())
    }
}

/// Text blob storage addressed by a path-like key
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the document under `key`, `StoreError::NotFound` if absent
    async fn read(&self, key: &str) -> Result<String, StoreError>;

    /// Create or replace the document under `key`
    async fn write(&self, key: &str, contents: &str) -> Result<(), StoreError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Build the backend selected by configuration
///
/// The local backend creates its data directory up front.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn BlobStore>, StoreError> {
    match config {
        StorageConfig::Local { data_dir } => {
            let store = LocalStore::new(data_dir.clone());
            store.ensure_root().await?;
            info!(data_dir = %data_dir.display(), "Using local document store");
            Ok(Arc::new(store))
        }
        StorageConfig::WebDav { url, credentials } => {
            info!(url = %url, authenticated = credentials.is_some(), "Using WebDAV document store");
            Ok(Arc::new(WebDavStore::new(url, credentials.clone())))
        }
        StorageConfig::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
