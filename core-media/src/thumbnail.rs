//! Thumbnail Cache - Write-once local copies of 500px thumbnails
//!
//! Thumbnails are stored as `{local_images_dir}/{photo_id}.{format}`. Once a
//! regular file exists there it is served as-is: there is no index, no eviction and no
//! revalidation against the remote copy.
//!
//! ## Failure model
//!
//! A failed download (transport error, non-2xx status, empty body) is a
//! degraded outcome: [`ThumbnailCache::ensure_local`] logs it and returns
//! `Ok(None)` so the caller can fall back to a default thumbnail. Failing to
//! write the downloaded bytes is a real error.
//!
//! Two concurrent requests for the same missing thumbnail may both download
//! it; the last write wins.

use crate::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest};
use bridge_traits::storage::FileSystemAccess;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Local thumbnail cache backed by a host file system and HTTP client
#[derive(Clone)]
pub struct ThumbnailCache {
    http_client: Arc<dyn HttpClient>,
    file_system: Arc<dyn FileSystemAccess>,
    request_timeout: Option<Duration>,
}

impl ThumbnailCache {
    pub fn new(http_client: Arc<dyn HttpClient>, file_system: Arc<dyn FileSystemAccess>) -> Self {
        Self {
            http_client,
            file_system,
            request_timeout: None,
        }
    }

    /// Per-download timeout; the HTTP client default applies otherwise
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Path of the cached thumbnail for `photo_id`
    ///
    /// Pure function of its inputs; no I/O.
    pub fn local_uri(dir: &Path, photo_id: &str, format: &str) -> PathBuf {
        dir.join(format!("{}.{}", photo_id, format))
    }

    /// Creates the cache directory (and parents) when missing
    pub async fn prepare_directory(&self, dir: &Path) -> Result<()> {
        if !self.file_system.exists(dir).await? {
            self.file_system.create_dir_all(dir).await?;
            info!(path = %dir.display(), "Created thumbnail directory");
        }
        Ok(())
    }

    /// Returns `local_path`, downloading `remote_url` into it first if needed
    ///
    /// Only a regular file counts as cached. Returns `Ok(None)` when the file
    /// is missing and could not be downloaded.
    #[instrument(skip(self, local_path), fields(path = %local_path.display()))]
    pub async fn ensure_local(
        &self,
        remote_url: &str,
        local_path: &Path,
    ) -> Result<Option<PathBuf>> {
        if self.file_system.is_file(local_path).await? {
            debug!("Thumbnail already cached");
            return Ok(Some(local_path.to_path_buf()));
        }

        let Some(data) = self.download(remote_url).await else {
            return Ok(None);
        };

        self.file_system
            .write_file(local_path, data.clone())
            .await?;
        info!(size = data.len(), "Cached thumbnail");

        Ok(Some(local_path.to_path_buf()))
    }

    async fn download(&self, url: &str) -> Option<Bytes> {
        let mut request = HttpRequest::get(url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "Thumbnail download failed");
                return None;
            }
        };

        if !response.is_success() {
            warn!(url, status = response.status, "Thumbnail download rejected");
            return None;
        }

        if response.body.is_empty() {
            warn!(url, "Thumbnail download returned an empty body");
            return None;
        }

        Some(response.body)
    }
}
