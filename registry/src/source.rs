//! Where the metadata document comes from.

use crate::{MetadataDocument, ResolutionError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the published version metadata.
pub const DEFAULT_METADATA_URL: &str = "https://api.nexusmutual.io/version-data/data.json";

/// Request timeout for a metadata fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A read-only source of the registry metadata document.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the whole document. Called once per session.
    async fn fetch(&self) -> Result<MetadataDocument, ResolutionError>;

    /// Where the document comes from, for logs.
    fn describe(&self) -> String;
}

/// Fetches the metadata document over HTTP.
pub struct HttpMetadataSource {
    url: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpMetadataSource {
    /// Source pointing at [`DEFAULT_METADATA_URL`].
    pub fn new() -> Self {
        Self::with_url(DEFAULT_METADATA_URL)
    }

    pub fn with_url(url: &str) -> Self {
        Self {
            url: url.trim().to_string(),
            client: reqwest::Client::new(),
            timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpMetadataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self) -> Result<MetadataDocument, ResolutionError> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ResolutionError::MetadataFetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(ResolutionError::MetadataFetch(format!(
                "HTTP {} from {}",
                resp.status(),
                self.url
            )));
        }

        resp.json()
            .await
            .map_err(|e| ResolutionError::MetadataInvalid(e.to_string()))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the metadata document from a local JSON file, e.g. a saved copy of
/// the published document for offline runs.
pub struct FileMetadataSource {
    path: PathBuf,
}

impl FileMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetadataSource for FileMetadataSource {
    async fn fetch(&self) -> Result<MetadataDocument, ResolutionError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ResolutionError::MetadataFetch(format!("{}: {e}", self.path.display()))
        })?;
        MetadataDocument::from_json(&contents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
