use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::PLACEHOLDER_IMAGE;
use crate::domain::ImageRef;
use crate::error::{Result, TrackerError};

/// Blob storage seam: resolves opaque storage paths into fetchable URLs
/// and accepts uploads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Resolves a storage path to an externally-fetchable URL.
    async fn download_url(&self, path: &str) -> Result<String>;

    /// Uploads bytes under `path` and returns the resulting URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Resolves a record's image references into displayable URLs, preserving
/// order. Literal URLs pass through untouched; bare storage paths are
/// resolved concurrently. A failed or empty resolution yields the
/// placeholder image, never an error: a missing picture must not take the
/// whole record down.
pub async fn resolve_images(store: Arc<dyn BlobStore>, refs: &[ImageRef]) -> Vec<String> {
    let handles: Vec<_> = refs
        .iter()
        .cloned()
        .map(|image| {
            let store = store.clone();
            tokio::spawn(async move {
                match image {
                    ImageRef::Url(url) => url,
                    ImageRef::Path(path) if path.is_empty() => PLACEHOLDER_IMAGE.to_string(),
                    ImageRef::Path(path) => match store.download_url(&path).await {
                        Ok(url) => url,
                        Err(e) => {
                            warn!("Failed to resolve image '{}': {}", path, e);
                            PLACEHOLDER_IMAGE.to_string()
                        }
                    },
                }
            })
        })
        .collect();

    let mut urls = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(url) => urls.push(url),
            Err(_) => urls.push(PLACEHOLDER_IMAGE.to_string()),
        }
    }
    urls
}

/// Uploads a batch of files with fan-out/fan-in semantics: every upload is
/// launched concurrently and the batch succeeds only if every upload
/// succeeds. Partial success is not a supported terminal state; any single
/// failure fails the whole batch.
pub async fn upload_all(
    store: Arc<dyn BlobStore>,
    files: Vec<(String, Vec<u8>)>,
) -> Result<Vec<String>> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|(path, bytes)| {
            let store = store.clone();
            tokio::spawn(async move { store.upload(&path, bytes).await })
        })
        .collect();

    let mut urls = Vec::with_capacity(handles.len());
    for handle in handles {
        let url = handle.await.map_err(|e| TrackerError::Blob {
            message: format!("upload task panicked: {}", e),
        })??;
        urls.push(url);
    }

    debug!(count = urls.len(), "Uploaded image batch");
    Ok(urls)
}

/// Blob store backed by a hosted object-storage HTTP API.
pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl HttpBlobStore {
    pub fn new(base_url: &str, bucket: &str, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            api_key,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.base_url,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn download_url(&self, path: &str) -> Result<String> {
        // The store exposes objects at stable URLs; confirm the object
        // exists before handing the URL out.
        let url = self.object_url(path);
        let response = self.authorize(self.client.head(&url)).send().await?;
        if !response.status().is_success() {
            return Err(TrackerError::Blob {
                message: format!("object '{}' responded {}", path, response.status()),
            });
        }
        Ok(url)
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        let url = self.object_url(path);
        let response = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Blob {
                message: format!("upload of '{}' failed: {} - {}", path, status, body),
            });
        }
        Ok(url)
    }
}

/// In-memory blob store for local runs and tests.
pub struct InMemoryBlobStore {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self {
            objects: std::sync::Mutex::new(std::collections::HashMap::new()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn download_url(&self, path: &str) -> Result<String> {
        let objects = self.objects.lock().unwrap();
        if objects.contains_key(path) {
            Ok(format!("memory://{}", path))
        } else {
            Err(TrackerError::Blob {
                message: format!("object '{}' not found", path),
            })
        }
    }

    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String> {
        let mut objects = self.objects.lock().unwrap();
        objects.insert(path.to_string(), bytes);
        Ok(format!("memory://{}", path))
    }
}
