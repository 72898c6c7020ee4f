//! # Configuration Module
//!
//! Server and storage settings, read from environment variables (a `.env`
//! file is loaded first by `main`).
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PORT` | `3000` |
//! | `BIND_ADDRESS` | `0.0.0.0` |
//! | `STATIC_DIR` | `.` |
//! | `STORAGE_BACKEND` | `local` (`local`, `webdav`, `memory`) |
//! | `DATA_DIR` | `data` |
//! | `WEBDAV_URL` | required for `webdav` |
//! | `WEBDAV_USERNAME`, `WEBDAV_PASSWORD` | unset |
//! | `LOG_FORMAT` | `text` (`text`, `json`) |

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::storage::webdav::WebDavCredentials;

// Constants for server configuration
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_STATIC_DIR: &str = ".";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the JSON documents are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Files in a local directory
    Local { data_dir: PathBuf },
    /// Documents in a WebDAV collection
    WebDav {
        url: String,
        credentials: Option<WebDavCredentials>,
    },
    /// Process memory only
    Memory,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration structure for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    /// Directory holding `index.html` and `images/`
    pub static_dir: PathBuf,
    pub storage: StorageConfig,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            storage: StorageConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{raw}'"))?,
            None => defaults.port,
        };

        let storage = match get("STORAGE_BACKEND").as_deref().map(str::trim) {
            None | Some("local") => StorageConfig::Local {
                data_dir: get("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            },
            Some("webdav") => {
                let url = get("WEBDAV_URL")
                    .context("WEBDAV_URL must be set when STORAGE_BACKEND=webdav")?;
                let credentials = get("WEBDAV_USERNAME").map(|username| WebDavCredentials {
                    username,
                    password: get("WEBDAV_PASSWORD"),
                });
                StorageConfig::WebDav { url, credentials }
            }
            Some("memory") => StorageConfig::Memory,
            Some(other) => bail!("Unknown STORAGE_BACKEND '{other}' (expected local, webdav or memory)"),
        };

        let log_format = match get("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("Unknown LOG_FORMAT '{other}' (expected text or json)"),
        };

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port,
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            storage,
            log_format,
        })
    }

    /// `address:port` for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
