//! File System Abstraction
//!
//! Provides a platform-agnostic trait for the file I/O the thumbnail cache
//! needs.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use crate::error::Result;

/// File system access trait
///
/// Abstracts file I/O so hosts can point the cache at their own storage
/// (a public files directory, a sandbox, an in-memory double in tests).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn cache_data(fs: &dyn FileSystemAccess, dir: &Path, data: Bytes) -> Result<()> {
///     fs.create_dir_all(dir).await?;
///     let file_path = dir.join("12345.jpg");
///     if !fs.is_file(&file_path).await? {
///         fs.write_file(&file_path, data).await?;
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Check that `path` is an existing regular file
    async fn is_file(&self, path: &Path) -> Result<bool>;

    /// Create a directory and all parent directories if they don't exist
    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write data to a file, replacing any existing content
    async fn write_file(&self, path: &Path, data: Bytes) -> Result<()>;
}
