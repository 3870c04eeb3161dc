//! Core service façade and bootstrap helpers.
//!
//! This crate wires a validated [`CoreConfig`] and the host-provided bridge
//! implementations (HTTP, filesystem, remote photo service) into a ready
//! [`D500pxMediaType`]. Desktop hosts typically enable the `desktop-shims`
//! feature (reqwest / tokio bridges) together with `remote-api` (the 500px
//! REST client); other hosts inject their own bridges through
//! [`CoreDependencies`].

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::{http::HttpClient, photo::PhotoService, storage::FileSystemAccess};
use core_media::{
    ConstraintViolation, D500pxMediaType, EmbedFormatter, FieldValue, MediaField, MediaRecord,
    MediaTypeConfig, RenderedEmbed, ThumbnailCache,
};
use core_runtime::config::CoreConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use tracing::info;

/// Aggregated handle to the bridge dependencies the core requires.
///
/// All handles are optional: with the 500px API disabled none of them is
/// used.
#[derive(Clone, Default)]
pub struct CoreDependencies {
    pub http_client: Option<Arc<dyn HttpClient>>,
    pub file_system: Option<Arc<dyn FileSystemAccess>>,
    pub photo_service: Option<Arc<dyn PhotoService>>,
}

impl CoreDependencies {
    /// Take the HTTP and filesystem bridges from the configuration.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            http_client: config.http_client.clone(),
            file_system: config.file_system.clone(),
            photo_service: None,
        }
    }

    pub fn with_photo_service(mut self, service: Arc<dyn PhotoService>) -> Self {
        self.photo_service = Some(service);
        self
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    deps: Arc<CoreDependencies>,
    media_type: D500pxMediaType,
    formatter: EmbedFormatter,
}

impl CoreService {
    /// Create a service, building the 500px client from the configuration.
    ///
    /// With the API enabled this requires the `remote-api` feature; without
    /// it, use [`CoreService::with_dependencies`] and inject a
    /// `PhotoService`.
    pub fn new(config: CoreConfig) -> Result<Self> {
        let deps = CoreDependencies::from_config(&config);
        let deps = if config.use_500px_api {
            deps.with_photo_service(default_photo_service(&config)?)
        } else {
            deps
        };
        Self::with_dependencies(config, deps)
    }

    /// Create a service from explicit bridge handles.
    ///
    /// Handles missing from `deps` are taken from the configuration.
    pub fn with_dependencies(config: CoreConfig, deps: CoreDependencies) -> Result<Self> {
        if config.use_500px_api {
            config.api.validate()?;
        }
        let deps = CoreDependencies {
            http_client: deps.http_client.or_else(|| config.http_client.clone()),
            file_system: deps.file_system.or_else(|| config.file_system.clone()),
            photo_service: deps.photo_service,
        };

        let mut media_type = D500pxMediaType::new(MediaTypeConfig::from(&config));

        if config.use_500px_api {
            let photo_service = deps.photo_service.clone().ok_or_else(|| {
                capability_missing(
                    "PhotoService",
                    "A PhotoService is required when the 500px API is enabled. \
                     Enable the 'remote-api' feature or inject one with \
                     CoreDependencies::with_photo_service().",
                )
            })?;
            let http_client = deps.http_client.clone().ok_or_else(|| {
                capability_missing("HttpClient", "An HttpClient is required to download thumbnails.")
            })?;
            let file_system = deps.file_system.clone().ok_or_else(|| {
                capability_missing(
                    "FileSystemAccess",
                    "A FileSystemAccess is required to cache thumbnails.",
                )
            })?;

            let cache = ThumbnailCache::new(http_client, file_system)
                .with_request_timeout(config.api.request_timeout);
            media_type = media_type
                .with_photo_service(photo_service)
                .with_thumbnail_cache(cache);
        }

        info!(
            use_500px_api = config.use_500px_api,
            source_field = config.source_field.as_deref().unwrap_or("<unset>"),
            "500px media service ready"
        );

        Ok(Self {
            config: Arc::new(config),
            deps: Arc::new(deps),
            media_type,
            formatter: EmbedFormatter::new(),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    pub fn media_type(&self) -> &D500pxMediaType {
        &self.media_type
    }

    pub fn provided_fields(&self) -> Vec<(MediaField, &'static str)> {
        self.media_type.provided_fields()
    }

    /// Resolve a field by its host name for `record`.
    pub async fn get_field(&self, record: &dyn MediaRecord, name: &str) -> Result<Option<FieldValue>> {
        Ok(self.media_type.get_field_by_name(record, name).await?)
    }

    pub async fn thumbnail(&self, record: &dyn MediaRecord) -> std::path::PathBuf {
        self.media_type.thumbnail(record).await
    }

    pub async fn default_name(&self, record: &dyn MediaRecord) -> String {
        self.media_type.default_name(record).await
    }

    pub fn validate(&self, record: &dyn MediaRecord) -> std::result::Result<(), ConstraintViolation> {
        self.media_type.validate_record(record)
    }

    /// Render stored embed codes for display.
    pub fn render(&self, items: &[String]) -> Vec<RenderedEmbed> {
        self.formatter.render(items)
    }
}

fn capability_missing(capability: &str, message: &str) -> CoreError {
    CoreError::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

#[cfg(feature = "remote-api")]
fn default_photo_service(config: &CoreConfig) -> Result<Arc<dyn PhotoService>> {
    use provider_d500px::D500pxClient;

    let http_client = config.http_client.clone().ok_or_else(|| {
        capability_missing("HttpClient", "An HttpClient is required to call the 500px API.")
    })?;
    let client = D500pxClient::from_config(http_client, &config.api)?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "remote-api"))]
fn default_photo_service(_config: &CoreConfig) -> Result<Arc<dyn PhotoService>> {
    Err(capability_missing(
        "PhotoService",
        "The 500px API is enabled but the 'remote-api' feature is off. \
         Enable it or inject a PhotoService with CoreService::with_dependencies().",
    ))
}

/// Initialize logging, then build the service.
///
/// ```ignore
/// use core_runtime::config::{CoreConfig, D500pxApiConfig};
/// use core_runtime::logging::LoggingConfig;
///
/// let config = CoreConfig::builder()
///     .local_images_dir("/var/www/files/500px")
///     .icon_base("/var/www/files/media-icons")
///     .source_field("field_embed_code")
///     .use_500px_api(true)
///     .api_config(D500pxApiConfig::from_env())
///     .build()?;
/// let core = core_service::bootstrap(config, LoggingConfig::default())?;
/// ```
pub fn bootstrap(config: CoreConfig, logging: LoggingConfig) -> Result<CoreService> {
    init_logging(logging).map_err(|e| CoreError::InitializationFailed(e.to_string()))?;
    CoreService::new(config)
}
