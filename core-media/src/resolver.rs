//! Metadata Resolver - Maps embed codes to field values
//!
//! `shortcode` and `id` come straight from the embed match. Every other field
//! needs the photo record from the remote [`PhotoService`], which is only
//! consulted when remote lookups are enabled and a service is configured.
//!
//! ## Field table
//!
//! | Field | Source |
//! |-------|--------|
//! | `name`, `description`, `camera` | photo attribute of the same name |
//! | `username` | author's username |
//! | `votes` | `votes_count` |
//! | `thumbnail` | URL of the second image rendition |
//! | `thumbnail_local_uri` | `{local_images_dir}/{id}.{format of second rendition}` |
//! | `thumbnail_local` | the above, downloaded on first access |
//!
//! A missing attribute resolves to `None`. A failing remote lookup is an
//! error ([`MediaError::RemoteFetchFailed`]).

use crate::embed::{EmbedMatcher, MatchResult};
use crate::error::{MediaError, Result};
use crate::fields::{FieldValue, MediaField};
use crate::thumbnail::ThumbnailCache;
use bridge_traits::photo::{PhotoImage, PhotoMetadata, PhotoService};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Index of the image rendition used as thumbnail
pub const THUMBNAIL_IMAGE_INDEX: usize = 1;

type Accessor = fn(&PhotoMetadata) -> Option<FieldValue>;

/// Remote attributes that map directly onto a field
const PHOTO_ACCESSORS: &[(MediaField, Accessor)] = &[
    (MediaField::Name, photo_name),
    (MediaField::Description, photo_description),
    (MediaField::Username, photo_username),
    (MediaField::Camera, photo_camera),
    (MediaField::Votes, photo_votes),
    (MediaField::Thumbnail, photo_thumbnail),
];

fn photo_name(photo: &PhotoMetadata) -> Option<FieldValue> {
    photo.name.clone().map(FieldValue::Text)
}

fn photo_description(photo: &PhotoMetadata) -> Option<FieldValue> {
    photo.description.clone().map(FieldValue::Text)
}

fn photo_username(photo: &PhotoMetadata) -> Option<FieldValue> {
    photo.username.clone().map(FieldValue::Text)
}

fn photo_camera(photo: &PhotoMetadata) -> Option<FieldValue> {
    photo.camera.clone().map(FieldValue::Text)
}

fn photo_votes(photo: &PhotoMetadata) -> Option<FieldValue> {
    photo.votes_count.map(FieldValue::Count)
}

fn photo_thumbnail(photo: &PhotoMetadata) -> Option<FieldValue> {
    thumbnail_image(photo).map(|image| FieldValue::Text(image.url.clone()))
}

fn thumbnail_image(photo: &PhotoMetadata) -> Option<&PhotoImage> {
    photo
        .image(THUMBNAIL_IMAGE_INDEX)
        .filter(|image| !image.url.is_empty())
}

/// Looks up a field accessor in the photo table
pub fn photo_accessor(field: MediaField) -> Option<Accessor> {
    PHOTO_ACCESSORS
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map(|(_, accessor)| *accessor)
}

/// Resolves media fields from raw embed text
#[derive(Clone)]
pub struct MetadataResolver {
    matcher: EmbedMatcher,
    local_images_dir: PathBuf,
    use_remote: bool,
    photo_service: Option<Arc<dyn PhotoService>>,
    thumbnails: Option<ThumbnailCache>,
}

impl MetadataResolver {
    /// Resolver with remote lookups disabled
    pub fn new(local_images_dir: impl Into<PathBuf>) -> Self {
        Self {
            matcher: EmbedMatcher::default(),
            local_images_dir: local_images_dir.into(),
            use_remote: false,
            photo_service: None,
            thumbnails: None,
        }
    }

    pub fn with_matcher(mut self, matcher: EmbedMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Enables remote lookups through `service`
    pub fn with_photo_service(mut self, service: Arc<dyn PhotoService>) -> Self {
        self.photo_service = Some(service);
        self.use_remote = true;
        self
    }

    pub fn with_remote_lookups(mut self, enabled: bool) -> Self {
        self.use_remote = enabled;
        self
    }

    pub fn with_thumbnail_cache(mut self, cache: ThumbnailCache) -> Self {
        self.thumbnails = Some(cache);
        self
    }

    pub fn local_images_dir(&self) -> &Path {
        &self.local_images_dir
    }

    pub fn matcher(&self) -> &EmbedMatcher {
        &self.matcher
    }

    /// Whether remote fields can be resolved at all
    pub fn remote_enabled(&self) -> bool {
        self.use_remote && self.photo_service.is_some()
    }

    /// Resolves a field given by its host name; unknown names resolve to `None`
    pub async fn get_field_by_name(&self, text: &str, name: &str) -> Result<Option<FieldValue>> {
        match MediaField::from_name(name) {
            Some(field) => self.get_field(text, field).await,
            None => {
                debug!(field = name, "Unknown media field");
                Ok(None)
            }
        }
    }

    /// Resolves `field` for the embed code in `text`
    ///
    /// Text that is not an embed code resolves every field to `None`. At most
    /// one remote lookup is made per call.
    #[instrument(skip(self, text, field), fields(field = %field))]
    pub async fn get_field(&self, text: &str, field: MediaField) -> Result<Option<FieldValue>> {
        let Some(matched) = self.matcher.match_embed(text) else {
            debug!("No embed code match");
            return Ok(None);
        };

        match field {
            MediaField::Shortcode => return Ok(Some(FieldValue::Text(matched.shortcode))),
            MediaField::Id => return Ok(matched.id.map(FieldValue::Text)),
            _ => {}
        }

        let Some(photo) = self.fetch(&matched).await? else {
            return Ok(None);
        };
        let Some(photo_id) = matched.id.as_deref() else {
            return Ok(None);
        };

        if let Some(accessor) = photo_accessor(field) {
            return Ok(accessor(&photo));
        }

        match field {
            MediaField::ThumbnailLocalUri => Ok(self
                .thumbnail_local_uri(photo_id, &photo)
                .map(FieldValue::Path)),
            MediaField::ThumbnailLocal => self
                .thumbnail_local(photo_id, &photo)
                .await
                .map(|path| path.map(FieldValue::Path)),
            _ => Ok(None),
        }
    }

    /// Fetches the photo record, or `None` when remote lookups are unavailable
    async fn fetch(&self, matched: &MatchResult) -> Result<Option<PhotoMetadata>> {
        let service = match (&self.photo_service, self.use_remote) {
            (Some(service), true) => service,
            _ => {
                debug!("Remote lookups disabled");
                return Ok(None);
            }
        };
        let Some(photo_id) = matched.id.as_deref() else {
            return Ok(None);
        };

        debug!(photo_id, "Fetching photo from 500px");
        service
            .fetch_photo(photo_id)
            .await
            .map(Some)
            .map_err(|e| MediaError::RemoteFetchFailed {
                photo_id: photo_id.to_string(),
                message: e.to_string(),
            })
    }

    fn thumbnail_local_uri(&self, photo_id: &str, photo: &PhotoMetadata) -> Option<PathBuf> {
        let format = thumbnail_image(photo)?.format.as_deref()?;
        Some(ThumbnailCache::local_uri(
            &self.local_images_dir,
            photo_id,
            format,
        ))
    }

    async fn thumbnail_local(
        &self,
        photo_id: &str,
        photo: &PhotoMetadata,
    ) -> Result<Option<PathBuf>> {
        let Some(cache) = &self.thumbnails else {
            debug!("No thumbnail cache configured");
            return Ok(None);
        };

        cache.prepare_directory(&self.local_images_dir).await?;

        let Some(local_uri) = self.thumbnail_local_uri(photo_id, photo) else {
            return Ok(None);
        };
        let Some(image) = thumbnail_image(photo) else {
            return Ok(None);
        };

        cache.ensure_local(&image.url, &local_uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use mockall::mock;

    mock! {
        Photos {}

        #[async_trait]
        impl PhotoService for Photos {
            async fn fetch_photo(&self, id: &str) -> BridgeResult<PhotoMetadata>;
        }
    }

    const EMBED: &str = "<div class='pixels-photo'><p><img src='https://drscdn.500px.org/photo/12345/m%3D2000/v2?sig=abc' alt='x'></p><a href='https://500px.com/photo/12345/foo' alt='y'></a></div><script type='text/javascript' src='https://500px.com/embed.js'></script>";

    fn full_photo() -> PhotoMetadata {
        PhotoMetadata {
            id: "12345".to_string(),
            name: Some("Dawn".to_string()),
            description: Some("Sunrise over the bay".to_string()),
            username: Some("alice".to_string()),
            camera: Some("X100V".to_string()),
            votes_count: Some(42),
            images: vec![
                PhotoImage::new("https://drscdn.500px.org/photo/12345/q%3D50_w%3D140/a")
                    .with_size(100)
                    .with_format("jpeg"),
                PhotoImage::new("https://drscdn.500px.org/photo/12345/q%3D50_w%3D280/b")
                    .with_size(200)
                    .with_format("jpg"),
            ],
        }
    }

    fn resolver_with(photos: MockPhotos) -> MetadataResolver {
        MetadataResolver::new("/var/cache/500px").with_photo_service(Arc::new(photos))
    }

    #[test]
    fn test_accessor_table_covers_direct_fields() {
        let photo = full_photo();
        let expected = [
            (MediaField::Name, FieldValue::Text("Dawn".into())),
            (MediaField::Description, FieldValue::Text("Sunrise over the bay".into())),
            (MediaField::Username, FieldValue::Text("alice".into())),
            (MediaField::Camera, FieldValue::Text("X100V".into())),
            (MediaField::Votes, FieldValue::Count(42)),
            (
                MediaField::Thumbnail,
                FieldValue::Text("https://drscdn.500px.org/photo/12345/q%3D50_w%3D280/b".into()),
            ),
        ];

        for (field, value) in expected {
            let accessor = photo_accessor(field).unwrap();
            assert_eq!(accessor(&photo), Some(value), "field {}", field);
        }

        assert!(photo_accessor(MediaField::Shortcode).is_none());
        assert!(photo_accessor(MediaField::ThumbnailLocal).is_none());
    }

    #[tokio::test]
    async fn test_shortcode_and_id_never_fetch() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().times(0);
        let resolver = resolver_with(photos);

        let shortcode = resolver.get_field(EMBED, MediaField::Shortcode).await.unwrap();
        assert_eq!(shortcode, Some(FieldValue::Text(EMBED.to_string())));

        let id = resolver.get_field(EMBED, MediaField::Id).await.unwrap();
        assert_eq!(id, Some(FieldValue::Text("12345".to_string())));
    }

    #[tokio::test]
    async fn test_remote_disabled_returns_none_without_fetch() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().times(0);
        let resolver = resolver_with(photos).with_remote_lookups(false);

        for field in MediaField::ALL.into_iter().filter(MediaField::is_remote) {
            assert_eq!(resolver.get_field(EMBED, field).await.unwrap(), None);
        }
        assert!(!resolver.remote_enabled());
    }

    #[tokio::test]
    async fn test_no_match_resolves_nothing() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().times(0);
        let resolver = resolver_with(photos);

        for field in MediaField::ALL {
            assert_eq!(
                resolver.get_field("not an embed code", field).await.unwrap(),
                None
            );
        }
    }

    #[tokio::test]
    async fn test_remote_fields_fetch_once_per_call() {
        let mut photos = MockPhotos::new();
        photos
            .expect_fetch_photo()
            .withf(|id| id == "12345")
            .times(2)
            .returning(|_| Ok(full_photo()));
        let resolver = resolver_with(photos);

        let username = resolver.get_field(EMBED, MediaField::Username).await.unwrap();
        assert_eq!(username, Some(FieldValue::Text("alice".into())));

        let votes = resolver.get_field(EMBED, MediaField::Votes).await.unwrap();
        assert_eq!(votes, Some(FieldValue::Count(42)));
    }

    #[tokio::test]
    async fn test_missing_images_resolve_to_none() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().returning(|_| {
            let mut photo = PhotoMetadata::new("12345");
            photo.username = Some("alice".to_string());
            Ok(photo)
        });
        let resolver = resolver_with(photos);

        assert_eq!(resolver.get_field(EMBED, MediaField::Thumbnail).await.unwrap(), None);
        assert_eq!(
            resolver
                .get_field(EMBED, MediaField::ThumbnailLocalUri)
                .await
                .unwrap(),
            None
        );
        assert_eq!(resolver.get_field(EMBED, MediaField::Name).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_url_less_thumbnail_slot_is_none() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().returning(|_| {
            let mut photo = full_photo();
            photo.images[1].url = String::new();
            Ok(photo)
        });
        let resolver = resolver_with(photos);

        assert_eq!(resolver.get_field(EMBED, MediaField::Thumbnail).await.unwrap(), None);
        assert_eq!(
            resolver
                .get_field(EMBED, MediaField::ThumbnailLocalUri)
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_thumbnail_local_uri_is_pure_path() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().returning(|_| Ok(full_photo()));
        let resolver = resolver_with(photos);

        let uri = resolver
            .get_field(EMBED, MediaField::ThumbnailLocalUri)
            .await
            .unwrap();
        assert_eq!(
            uri,
            Some(FieldValue::Path(PathBuf::from("/var/cache/500px/12345.jpg")))
        );
    }

    #[tokio::test]
    async fn test_thumbnail_local_without_cache_is_none() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().returning(|_| Ok(full_photo()));
        let resolver = resolver_with(photos);

        assert_eq!(
            resolver.get_field(EMBED, MediaField::ThumbnailLocal).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_surfaced() {
        let mut photos = MockPhotos::new();
        photos.expect_fetch_photo().times(1).returning(|_| {
            Err(BridgeError::OperationFailed(
                "The media could not be retrieved.".to_string(),
            ))
        });
        let resolver = resolver_with(photos);

        let err = resolver
            .get_field(EMBED, MediaField::Name)
            .await
            .unwrap_err();
        match err {
            MediaError::RemoteFetchFailed { photo_id, message } => {
                assert_eq!(photo_id, "12345");
                assert!(message.contains("could not be retrieved"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_field_by_name() {
        let resolver = MetadataResolver::new("/var/cache/500px");

        assert_eq!(
            resolver.get_field_by_name(EMBED, "id").await.unwrap(),
            Some(FieldValue::Text("12345".into()))
        );
        assert_eq!(resolver.get_field_by_name(EMBED, "exif").await.unwrap(), None);
    }
}
