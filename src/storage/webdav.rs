//! WebDAV backend
//!
//! Documents live under a collection URL: `GET <base>/<key>` reads,
//! `PUT <base>/<key>` writes. Basic auth is sent when credentials are set.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, warn};

use super::{BlobStore, StoreError};

/// Credentials for HTTP basic auth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebDavCredentials {
    pub username: String,
    pub password: Option<String>,
}

pub struct WebDavStore {
    client: Client,
    base_url: String,
    credentials: Option<WebDavCredentials>,
}

impl WebDavStore {
    pub fn new(base_url: &str, credentials: Option<WebDavCredentials>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// URL of the document stored under `key`
    pub fn document_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.username, creds.password.as_ref()),
            None => request,
        }
    }
}

#[async_trait]
impl BlobStore for WebDavStore {
    async fn read(&self, key: &str) -> Result<String, StoreError> {
        let url = self.document_url(key);
        let response = self.authorize(self.client.get(&url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(key.to_string())),
            status if status.is_success() => {
                let body = response.text().await?;
                debug!(url = %url, bytes = body.len(), "Fetched document from WebDAV");
                Ok(body)
            }
            status => {
                warn!(url = %url, status = %status, "WebDAV read failed");
                Err(StoreError::Remote(format!("GET {url} returned {status}")))
            }
        }
    }

    async fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        let url = self.document_url(key);
        let response = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(contents.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "WebDAV write failed");
            return Err(StoreError::Remote(format!("PUT {url} returned {status}")));
        }

        debug!(url = %url, bytes = contents.len(), "Stored document on WebDAV");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "webdav"
    }
}
