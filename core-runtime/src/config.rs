//! # Core Configuration Module
//!
//! Provides configuration management for the 500px media integration.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds all settings and bridge dependencies the media core
//! needs. It enforces fail-fast validation so a misconfigured host finds out
//! at startup rather than on the first rendered field.
//!
//! ## Required Settings
//!
//! - `local_images_dir` - Directory holding cached 500px thumbnails
//! - `icon_base` - Directory holding the static `500px.png` fallback icon
//!
//! ## Remote API
//!
//! When `use_500px_api` is enabled, a consumer key must be configured and an
//! `HttpClient` plus a `FileSystemAccess` must be available. With the
//! `desktop-shims` feature the reqwest / tokio defaults are injected
//! automatically if none are provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, D500pxApiConfig};
//!
//! let config = CoreConfig::builder()
//!     .local_images_dir("/var/www/files/500px")
//!     .icon_base("/var/www/files/media-icons")
//!     .source_field("field_embed_code")
//!     .use_500px_api(true)
//!     .api_config(D500pxApiConfig::new().with_consumer_key("key"))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{FileSystemAccess, HttpClient};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default 500px REST API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.500px.com/v1";

/// Default message shown when an embed value fails validation
pub const DEFAULT_VALIDATION_MESSAGE: &str = "Not valid 500px embed code.";

/// Environment variable holding the 500px consumer key
pub const CONSUMER_KEY_ENV: &str = "D500PX_CONSUMER_KEY";

/// Environment variable overriding the 500px API base URL
pub const API_BASE_URL_ENV: &str = "D500PX_API_BASE_URL";

/// Core configuration for the 500px media integration.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Host field that stores the raw embed code
    pub source_field: Option<String>,

    /// Whether metadata beyond `shortcode`/`id` is fetched from 500px
    pub use_500px_api: bool,

    /// Directory where thumbnails are cached as `{id}.{format}`
    pub local_images_dir: PathBuf,

    /// Directory containing the default `500px.png` icon
    pub icon_base: PathBuf,

    /// Message reported for invalid embed codes
    pub validation_message: String,

    /// 500px REST API settings
    pub api: D500pxApiConfig,

    /// HTTP client (required when the API is enabled)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// File system access (required when the API is enabled)
    pub file_system: Option<Arc<dyn FileSystemAccess>>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("source_field", &self.source_field)
            .field("use_500px_api", &self.use_500px_api)
            .field("local_images_dir", &self.local_images_dir)
            .field("icon_base", &self.icon_base)
            .field("validation_message", &self.validation_message)
            .field("api", &self.api)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field(
                "file_system",
                &self
                    .file_system
                    .as_ref()
                    .map(|_| "FileSystemAccess { ... }"),
            )
            .finish()
    }
}

/// Configuration for the 500px REST API.
///
/// # Security Note
///
/// The consumer key should never be hardcoded in the binary. Load it from
/// the environment ([`D500pxApiConfig::from_env`]) or the host's secure
/// configuration. `Debug` output masks the key.
#[derive(Clone, PartialEq, Eq)]
pub struct D500pxApiConfig {
    /// 500px application consumer key
    pub consumer_key: Option<String>,

    /// API base URL, without trailing slash
    pub base_url: String,

    /// Image size codes requested with every photo lookup.
    ///
    /// The thumbnail is the second rendition, so at least two sizes are
    /// required when the API is enabled.
    pub image_sizes: Vec<u32>,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl std::fmt::Debug for D500pxApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("D500pxApiConfig")
            .field(
                "consumer_key",
                &self.consumer_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("image_sizes", &self.image_sizes)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for D500pxApiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl D500pxApiConfig {
    /// Creates a configuration with defaults and no consumer key
    pub fn new() -> Self {
        Self {
            consumer_key: None,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            image_sizes: vec![100, 200],
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Reads the consumer key and optional base URL from the environment
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.consumer_key = std::env::var(CONSUMER_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        config
    }

    pub fn with_consumer_key(mut self, key: impl Into<String>) -> Self {
        self.consumer_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_sizes(mut self, sizes: Vec<u32>) -> Self {
        self.image_sizes = sizes;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn has_consumer_key(&self) -> bool {
        self.consumer_key.is_some()
    }

    /// Validates the API settings
    pub fn validate(&self) -> Result<()> {
        match self.consumer_key.as_deref() {
            None => {
                return Err(Error::Config(format!(
                    "500px consumer key is required when the 500px API is enabled. \
                     Set it with D500pxApiConfig::with_consumer_key() or the {} \
                     environment variable.",
                    CONSUMER_KEY_ENV
                )))
            }
            Some(key) if key.trim().is_empty() => {
                return Err(Error::Config(
                    "500px consumer key cannot be empty".to_string(),
                ))
            }
            Some(_) => {}
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(Error::Config(format!(
                "500px API base URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.image_sizes.len() < 2 {
            return Err(Error::Config(
                "At least two image sizes are required; the thumbnail is the second rendition"
                    .to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout > Duration::from_secs(300) {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 300 seconds".to_string(),
            ));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Path of the static fallback thumbnail
    pub fn default_thumbnail(&self) -> PathBuf {
        self.icon_base.join("500px.png")
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Directories are not empty
    /// - The source field name, when set, is not blank
    /// - API settings and bridges are present when the API is enabled
    pub fn validate(&self) -> Result<()> {
        if self.local_images_dir.as_os_str().is_empty() {
            return Err(Error::Config(
                "Local images directory cannot be empty".to_string(),
            ));
        }

        if self.icon_base.as_os_str().is_empty() {
            return Err(Error::Config("Icon base cannot be empty".to_string()));
        }

        if let Some(field) = &self.source_field {
            if field.trim().is_empty() {
                return Err(Error::Config("Source field cannot be blank".to_string()));
            }
        }

        if self.use_500px_api {
            self.api.validate()?;

            if self.http_client.is_none() {
                return Err(http_client_missing_error());
            }
            if self.file_system.is_none() {
                return Err(file_system_missing_error());
            }
        }

        Ok(())
    }
}

fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "An HttpClient is required when the 500px API is enabled. \
                  Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                  Otherwise inject an implementation with .http_client()."
            .to_string(),
    }
}

fn file_system_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "FileSystemAccess".to_string(),
        message: "A FileSystemAccess is required to cache 500px thumbnails. \
                  Desktop: enable the 'desktop-shims' feature to use TokioFileSystem. \
                  Otherwise inject an implementation with .file_system()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Option<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(timeout));
    Some(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Option<Arc<dyn HttpClient>> {
    None
}

#[cfg(feature = "desktop-shims")]
fn provide_default_file_system() -> Option<Arc<dyn FileSystemAccess>> {
    use bridge_desktop::TokioFileSystem;

    let fs: Arc<dyn FileSystemAccess> = Arc::new(TokioFileSystem::new());
    Some(fs)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_file_system() -> Option<Arc<dyn FileSystemAccess>> {
    None
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    source_field: Option<String>,
    use_500px_api: bool,
    local_images_dir: Option<PathBuf>,
    icon_base: Option<PathBuf>,
    validation_message: Option<String>,
    api: Option<D500pxApiConfig>,
    http_client: Option<Arc<dyn HttpClient>>,
    file_system: Option<Arc<dyn FileSystemAccess>>,
}

impl CoreConfigBuilder {
    /// Sets the host field holding the embed code.
    pub fn source_field(mut self, field: impl Into<String>) -> Self {
        self.source_field = Some(field.into());
        self
    }

    /// Enables or disables 500px API lookups.
    ///
    /// Default: false
    pub fn use_500px_api(mut self, enabled: bool) -> Self {
        self.use_500px_api = enabled;
        self
    }

    /// Sets the thumbnail cache directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .local_images_dir("/var/cache/500px");
    /// ```
    pub fn local_images_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.local_images_dir = Some(path.into());
        self
    }

    /// Sets the directory of the fallback icon.
    pub fn icon_base<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.icon_base = Some(path.into());
        self
    }

    /// Overrides the validation failure message.
    pub fn validation_message(mut self, message: impl Into<String>) -> Self {
        self.validation_message = Some(message.into());
        self
    }

    /// Sets the 500px API configuration.
    pub fn api_config(mut self, config: D500pxApiConfig) -> Self {
        self.api = Some(config);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled and the API is turned on.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the file system access implementation.
    pub fn file_system(mut self, fs: Arc<dyn FileSystemAccess>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error when a required setting is missing, a value is
    /// invalid, or the API is enabled without the bridges it needs.
    pub fn build(self) -> Result<CoreConfig> {
        let local_images_dir = self.local_images_dir.ok_or_else(|| {
            Error::Config(
                "Local images directory is required. Use .local_images_dir() to set it."
                    .to_string(),
            )
        })?;

        let icon_base = self.icon_base.ok_or_else(|| {
            Error::Config("Icon base is required. Use .icon_base() to set it.".to_string())
        })?;

        let api = self.api.unwrap_or_default();

        let (http_client, file_system) = if self.use_500px_api {
            (
                self.http_client
                    .or_else(|| provide_default_http_client(api.request_timeout)),
                self.file_system.or_else(provide_default_file_system),
            )
        } else {
            (self.http_client, self.file_system)
        };

        let config = CoreConfig {
            source_field: self.source_field,
            use_500px_api: self.use_500px_api,
            local_images_dir,
            icon_base,
            validation_message: self
                .validation_message
                .unwrap_or_else(|| DEFAULT_VALIDATION_MESSAGE.to_string()),
            api,
            http_client,
            file_system,
        };

        config.validate()?;

        Ok(config)
    }
}
