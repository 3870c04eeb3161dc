//! 500px Media Type
//!
//! Host-facing façade over the resolver, the validator and the thumbnail
//! fallback. A host hands in its content record through [`MediaRecord`] and
//! asks for fields by name; the media type reads the configured source field
//! and does the rest.
//!
//! ## Usage
//!
//! ```ignore
//! use core_media::media_type::{D500pxMediaType, MediaTypeConfig};
//!
//! let media_type = D500pxMediaType::new(MediaTypeConfig::from(&core_config))
//!     .with_photo_service(photo_service)
//!     .with_thumbnail_cache(thumbnails);
//!
//! let name = media_type.default_name(&record).await;
//! let thumbnail = media_type.thumbnail(&record).await;
//! ```

use crate::error::Result;
use crate::fields::{FieldValue, MediaField};
use crate::resolver::MetadataResolver;
use crate::thumbnail::ThumbnailCache;
use crate::validation::{ConstraintViolation, EmbedCodeValidator};
use bridge_traits::photo::PhotoService;
use core_runtime::config::{CoreConfig, DEFAULT_VALIDATION_MESSAGE};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// File name of the static fallback thumbnail inside `icon_base`
pub const DEFAULT_THUMBNAIL_FILE: &str = "500px.png";

/// Fields that never need the remote API
const LOCAL_FIELDS: &[MediaField] = &[MediaField::Shortcode];

/// Fields listed as provided when the remote API is enabled
const REMOTE_FIELDS: &[MediaField] = &[
    MediaField::Id,
    MediaField::Name,
    MediaField::Description,
    MediaField::Username,
    MediaField::Camera,
    MediaField::Votes,
];

/// A host content record carrying a 500px embed code
pub trait MediaRecord {
    /// Raw text stored in the host field `field`, if any
    fn source_text(&self, field: &str) -> Option<String>;

    /// The host's own fallback label for the record
    fn default_name(&self) -> String;
}

/// Settings of a 500px media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTypeConfig {
    /// Host field holding the embed code; unset until the host picks one
    pub source_field: Option<String>,
    pub use_500px_api: bool,
    pub local_images_dir: PathBuf,
    pub icon_base: PathBuf,
    pub validation_message: String,
}

impl MediaTypeConfig {
    pub fn new(local_images_dir: impl Into<PathBuf>, icon_base: impl Into<PathBuf>) -> Self {
        Self {
            source_field: None,
            use_500px_api: false,
            local_images_dir: local_images_dir.into(),
            icon_base: icon_base.into(),
            validation_message: DEFAULT_VALIDATION_MESSAGE.to_string(),
        }
    }

    pub fn with_source_field(mut self, field: impl Into<String>) -> Self {
        self.source_field = Some(field.into());
        self
    }

    pub fn with_500px_api(mut self, enabled: bool) -> Self {
        self.use_500px_api = enabled;
        self
    }
}

impl From<&CoreConfig> for MediaTypeConfig {
    fn from(config: &CoreConfig) -> Self {
        Self {
            source_field: config.source_field.clone(),
            use_500px_api: config.use_500px_api,
            local_images_dir: config.local_images_dir.clone(),
            icon_base: config.icon_base.clone(),
            validation_message: config.validation_message.clone(),
        }
    }
}

/// The 500px media type
#[derive(Clone)]
pub struct D500pxMediaType {
    config: MediaTypeConfig,
    resolver: MetadataResolver,
    validator: EmbedCodeValidator,
}

impl D500pxMediaType {
    pub fn new(config: MediaTypeConfig) -> Self {
        let resolver = MetadataResolver::new(config.local_images_dir.clone());
        let validator = EmbedCodeValidator::new(config.validation_message.clone());
        Self {
            config,
            resolver,
            validator,
        }
    }

    /// Attaches the remote photo service; it is only used when the API is enabled
    pub fn with_photo_service(mut self, service: Arc<dyn PhotoService>) -> Self {
        self.resolver = self
            .resolver
            .with_photo_service(service)
            .with_remote_lookups(self.config.use_500px_api);
        self
    }

    pub fn with_thumbnail_cache(mut self, cache: ThumbnailCache) -> Self {
        self.resolver = self.resolver.with_thumbnail_cache(cache);
        self
    }

    pub fn config(&self) -> &MediaTypeConfig {
        &self.config
    }

    pub fn resolver(&self) -> &MetadataResolver {
        &self.resolver
    }

    /// Fields this media type exposes, with labels
    ///
    /// `shortcode` is always available; the photo attributes only when the
    /// 500px API is enabled.
    pub fn provided_fields(&self) -> Vec<(MediaField, &'static str)> {
        let remote: &[MediaField] = if self.config.use_500px_api {
            REMOTE_FIELDS
        } else {
            &[]
        };

        LOCAL_FIELDS
            .iter()
            .chain(remote)
            .map(|field| (*field, field.label()))
            .collect()
    }

    fn source_text(&self, record: &dyn MediaRecord) -> Option<String> {
        let field = self.config.source_field.as_deref()?;
        record.source_text(field)
    }

    /// Resolves `field` for the record's embed code
    pub async fn get_field(
        &self,
        record: &dyn MediaRecord,
        field: MediaField,
    ) -> Result<Option<FieldValue>> {
        let Some(text) = self.source_text(record) else {
            debug!(field = %field, "Record has no source value");
            return Ok(None);
        };
        self.resolver.get_field(&text, field).await
    }

    /// Resolves a field by its host name; unknown names resolve to `None`
    pub async fn get_field_by_name(
        &self,
        record: &dyn MediaRecord,
        name: &str,
    ) -> Result<Option<FieldValue>> {
        match MediaField::from_name(name) {
            Some(field) => self.get_field(record, field).await,
            None => Ok(None),
        }
    }

    /// Static fallback thumbnail
    pub fn default_thumbnail(&self) -> PathBuf {
        self.config.icon_base.join(DEFAULT_THUMBNAIL_FILE)
    }

    /// Local thumbnail of the record, or the default thumbnail
    pub async fn thumbnail(&self, record: &dyn MediaRecord) -> PathBuf {
        match self.get_field(record, MediaField::ThumbnailLocal).await {
            Ok(Some(FieldValue::Path(path))) => path,
            Ok(_) => self.default_thumbnail(),
            Err(e) => {
                warn!(error = %e, "Falling back to default thumbnail");
                self.default_thumbnail()
            }
        }
    }

    /// Display name for the record
    ///
    /// `"{username} - {id}"` when both resolve, the id alone when only the id
    /// does, the host default otherwise.
    pub async fn default_name(&self, record: &dyn MediaRecord) -> String {
        let Some(text) = self.source_text(record) else {
            return record.default_name();
        };

        let id = match self.resolver.get_field(&text, MediaField::Id).await {
            Ok(Some(id)) => id.to_string(),
            _ => return record.default_name(),
        };

        match self.resolver.get_field(&text, MediaField::Username).await {
            Ok(Some(username)) => format!("{} - {}", username, id),
            Ok(None) => id,
            Err(e) => {
                warn!(photo_id = %id, error = %e, "Using photo id as name");
                id
            }
        }
    }

    /// Runs the embed code constraint over the record's source field
    pub fn validate_record(&self, record: &dyn MediaRecord) -> std::result::Result<(), ConstraintViolation> {
        self.validator.validate(self.source_text(record).as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Record(Option<&'static str>);

    impl MediaRecord for Record {
        fn source_text(&self, field: &str) -> Option<String> {
            (field == "field_embed").then(|| self.0.map(str::to_string)).flatten()
        }

        fn default_name(&self) -> String {
            "media:7".to_string()
        }
    }

    fn config() -> MediaTypeConfig {
        MediaTypeConfig::new("/var/cache/500px", "/var/www/icons").with_source_field("field_embed")
    }

    #[test]
    fn test_provided_fields_without_api() {
        let media_type = D500pxMediaType::new(config());
        assert_eq!(
            media_type.provided_fields(),
            vec![(MediaField::Shortcode, "500px shortcode")]
        );
    }

    #[test]
    fn test_provided_fields_with_api() {
        let media_type = D500pxMediaType::new(config().with_500px_api(true));
        let fields: Vec<_> = media_type
            .provided_fields()
            .into_iter()
            .map(|(field, _)| field.as_str())
            .collect();

        assert_eq!(
            fields,
            vec!["shortcode", "id", "name", "description", "username", "camera", "votes"]
        );
    }

    #[test]
    fn test_default_thumbnail() {
        let media_type = D500pxMediaType::new(config());
        assert_eq!(
            media_type.default_thumbnail(),
            PathBuf::from("/var/www/icons/500px.png")
        );
    }

    #[tokio::test]
    async fn test_missing_source_field_resolves_nothing() {
        let media_type = D500pxMediaType::new(MediaTypeConfig::new("/c", "/i"));
        let record = Record(Some("anything"));

        assert_eq!(
            media_type.get_field(&record, MediaField::Shortcode).await.unwrap(),
            None
        );
        assert_eq!(media_type.default_name(&record).await, "media:7");
        assert_eq!(media_type.validate_record(&record), Ok(()));
    }

    #[tokio::test]
    async fn test_default_name_falls_back_to_host() {
        let media_type = D500pxMediaType::new(config());
        assert_eq!(
            media_type.default_name(&Record(Some("plain text"))).await,
            "media:7"
        );
        assert_eq!(media_type.default_name(&Record(None)).await, "media:7");
    }

    #[test]
    fn test_validate_record_uses_configured_message() {
        let mut cfg = config();
        cfg.validation_message = "Bad 500px code".to_string();
        let media_type = D500pxMediaType::new(cfg);

        let violation = media_type
            .validate_record(&Record(Some("<iframe></iframe>")))
            .unwrap_err();
        assert_eq!(violation.message, "Bad 500px code");
    }
}
