//! Integration tests for the 500px media type
//!
//! These tests drive the public façade end to end:
//! - Embed matching and validation on pasted markup
//! - Remote field resolution through a stub photo service
//! - Thumbnail caching on a real temporary directory
//! - Default name and default thumbnail fallbacks

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::photo::{PhotoImage, PhotoMetadata, PhotoService};
use bytes::Bytes;
use core_media::{
    is_valid_embed, D500pxMediaType, EmbedMatcher, FieldValue, MediaField, MediaRecord,
    MediaTypeConfig, ThumbnailCache,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const EMBED: &str = "<div class='pixels-photo'><p><img src='https://drscdn.500px.org/photo/12345/m%3D2000/v2?sig=abc' alt='x'></p><a href='https://500px.com/photo/12345/foo' alt='y'></a></div><script type='text/javascript' src='https://500px.com/embed.js'></script>";

const THUMBNAIL_URL: &str = "https://drscdn.500px.org/photo/12345/q%3D50_w%3D280/thumb";

/// Photo service returning a fixed record and counting calls
struct StubPhotos {
    photo: Option<PhotoMetadata>,
    calls: AtomicUsize,
}

impl StubPhotos {
    fn returning(photo: PhotoMetadata) -> Arc<Self> {
        Arc::new(Self {
            photo: Some(photo),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            photo: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoService for StubPhotos {
    async fn fetch_photo(&self, _id: &str) -> BridgeResult<PhotoMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.photo.clone().ok_or_else(|| {
            BridgeError::OperationFailed("The media could not be retrieved.".to_string())
        })
    }
}

/// HTTP client serving one fixed response and counting calls
struct StubHttp {
    status: u16,
    body: &'static [u8],
    calls: AtomicUsize,
}

impl StubHttp {
    fn new(status: u16, body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for StubHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        assert_eq!(request.url, THUMBNAIL_URL);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(HttpResponse {
            status: self.status,
            headers: HashMap::new(),
            body: Bytes::from_static(self.body),
        })
    }
}

struct Record(&'static str);

impl MediaRecord for Record {
    fn source_text(&self, field: &str) -> Option<String> {
        (field == "field_embed_code").then(|| self.0.to_string())
    }

    fn default_name(&self) -> String {
        "Untitled 500px photo".to_string()
    }
}

fn photo_with_images() -> PhotoMetadata {
    let mut photo = PhotoMetadata::new("12345");
    photo.username = Some("alice".to_string());
    photo.name = Some("Dawn".to_string());
    photo.images = vec![
        PhotoImage::new("https://drscdn.500px.org/photo/12345/q%3D50_w%3D140/small")
            .with_size(100)
            .with_format("jpeg"),
        PhotoImage::new(THUMBNAIL_URL)
            .with_size(200)
            .with_format("jpg"),
    ];
    photo
}

fn media_type(
    local_images_dir: &Path,
    use_api: bool,
    photos: Arc<StubPhotos>,
    http: Arc<StubHttp>,
) -> D500pxMediaType {
    let config = MediaTypeConfig::new(local_images_dir, "/var/www/icons")
        .with_source_field("field_embed_code")
        .with_500px_api(use_api);
    let cache = ThumbnailCache::new(
        http,
        Arc::new(TokioFileSystem::new()),
    );

    D500pxMediaType::new(config)
        .with_photo_service(photos)
        .with_thumbnail_cache(cache)
}

#[test]
fn test_matching_is_deterministic() {
    let matcher = EmbedMatcher::default();
    let first = matcher.match_embed(EMBED).unwrap();

    for _ in 0..5 {
        assert_eq!(matcher.match_embed(EMBED), Some(first.clone()));
    }
    assert_eq!(first.id.as_deref(), Some("12345"));
}

#[test]
fn test_non_embeds_are_invalid() {
    for text in ["not an embed code", "", "<div class='pixels-photo'></div>", EMBED.split_at(80).0] {
        assert!(!is_valid_embed(text), "accepted {text:?}");
    }
}

#[tokio::test]
async fn test_shortcode_never_calls_remote() {
    let dir = tempfile::tempdir().unwrap();
    let photos = StubPhotos::returning(photo_with_images());
    let http = StubHttp::new(200, b"jpeg");

    for use_api in [false, true] {
        let media = media_type(dir.path(), use_api, photos.clone(), http.clone());
        let shortcode = media
            .get_field(&Record(EMBED), MediaField::Shortcode)
            .await
            .unwrap();
        assert_eq!(shortcode, Some(FieldValue::Text(EMBED.to_string())));
    }

    assert_eq!(photos.calls(), 0);
}

#[tokio::test]
async fn test_remote_fields_absent_when_api_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let photos = StubPhotos::returning(photo_with_images());
    let http = StubHttp::new(200, b"jpeg");
    let media = media_type(dir.path(), false, photos.clone(), http.clone());

    let name = media.get_field_by_name(&Record(EMBED), "name").await.unwrap();
    assert_eq!(name, None);
    assert_eq!(media.thumbnail(&Record(EMBED)).await, media.default_thumbnail());
    assert_eq!(photos.calls(), 0);
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn test_thumbnail_absent_without_images() {
    let dir = tempfile::tempdir().unwrap();
    let mut photo = PhotoMetadata::new("12345");
    photo.username = Some("alice".to_string());
    let media = media_type(
        dir.path(),
        true,
        StubPhotos::returning(photo),
        StubHttp::new(200, b"jpeg"),
    );

    let thumbnail = media
        .get_field(&Record(EMBED), MediaField::Thumbnail)
        .await
        .unwrap();
    assert_eq!(thumbnail, None);
}

#[tokio::test]
async fn test_thumbnail_downloaded_once() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("public").join("500px");
    let http = StubHttp::new(200, b"jpeg-bytes");
    let media = media_type(
        &dir,
        true,
        StubPhotos::returning(photo_with_images()),
        http.clone(),
    );
    let expected = dir.join("12345.jpg");

    let first = media
        .get_field(&Record(EMBED), MediaField::ThumbnailLocal)
        .await
        .unwrap();
    assert_eq!(first, Some(FieldValue::Path(expected.clone())));
    assert_eq!(std::fs::read(&expected).unwrap(), b"jpeg-bytes");
    assert_eq!(http.calls(), 1);

    let second = media
        .get_field(&Record(EMBED), MediaField::ThumbnailLocal)
        .await
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(http.calls(), 1);

    assert_eq!(media.thumbnail(&Record(EMBED)).await, expected);
}

#[tokio::test]
async fn test_failed_download_uses_default_thumbnail() {
    let dir = tempfile::tempdir().unwrap();
    let http = StubHttp::new(503, b"");
    let media = media_type(
        dir.path(),
        true,
        StubPhotos::returning(photo_with_images()),
        http.clone(),
    );

    assert_eq!(
        media.thumbnail(&Record(EMBED)).await,
        Path::new("/var/www/icons/500px.png")
    );
    assert!(!dir.path().join("12345.jpg").exists());
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn test_local_uri_independent_of_call_order() {
    let dir = tempfile::tempdir().unwrap();
    let media = media_type(
        dir.path(),
        true,
        StubPhotos::returning(photo_with_images()),
        StubHttp::new(200, b"jpeg"),
    );
    let expected = Some(FieldValue::Path(dir.path().join("12345.jpg")));

    let before = media
        .get_field(&Record(EMBED), MediaField::ThumbnailLocalUri)
        .await
        .unwrap();
    media
        .get_field(&Record(EMBED), MediaField::ThumbnailLocal)
        .await
        .unwrap();
    media
        .get_field(&Record(EMBED), MediaField::Username)
        .await
        .unwrap();
    let after = media
        .get_field(&Record(EMBED), MediaField::ThumbnailLocalUri)
        .await
        .unwrap();

    assert_eq!(before, expected);
    assert_eq!(after, expected);
}

#[tokio::test]
async fn test_default_name_variants() {
    let dir = tempfile::tempdir().unwrap();
    let http = StubHttp::new(200, b"jpeg");

    let with_user = media_type(
        dir.path(),
        true,
        StubPhotos::returning(photo_with_images()),
        http.clone(),
    );
    assert_eq!(with_user.default_name(&Record(EMBED)).await, "alice - 12345");

    let id_only = media_type(
        dir.path(),
        true,
        StubPhotos::returning(PhotoMetadata::new("12345")),
        http.clone(),
    );
    assert_eq!(id_only.default_name(&Record(EMBED)).await, "12345");

    let api_off = media_type(
        dir.path(),
        false,
        StubPhotos::returning(photo_with_images()),
        http.clone(),
    );
    assert_eq!(api_off.default_name(&Record(EMBED)).await, "12345");

    let failing = StubPhotos::failing();
    let remote_down = media_type(dir.path(), true, failing.clone(), http.clone());
    assert_eq!(remote_down.default_name(&Record(EMBED)).await, "12345");
    assert_eq!(failing.calls(), 1);

    assert_eq!(
        with_user.default_name(&Record("not an embed code")).await,
        "Untitled 500px photo"
    );
}

#[tokio::test]
async fn test_remote_failure_is_an_error_for_fields() {
    let dir = tempfile::tempdir().unwrap();
    let media = media_type(
        dir.path(),
        true,
        StubPhotos::failing(),
        StubHttp::new(200, b"jpeg"),
    );

    let err = media
        .get_field(&Record(EMBED), MediaField::Camera)
        .await
        .unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("12345"));
}
