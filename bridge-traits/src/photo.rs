//! Remote Photo Service Abstraction
//!
//! The media core never talks to 500px directly; it asks a [`PhotoService`]
//! for a [`PhotoMetadata`] record and reads fields from it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One rendition of a photo as returned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoImage {
    /// Absolute URL of the rendition; empty when the service listed the
    /// rendition without an address
    pub url: String,
    /// File format / extension (e.g. `jpeg`, `jpg`, `png`), when reported
    pub format: Option<String>,
    /// Size code requested from the service (e.g. `100`, `200`)
    pub size: Option<u32>,
}

impl PhotoImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: None,
            size: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Photo metadata fetched from the remote service
///
/// Every attribute except `id` is optional: the service omits fields freely
/// and callers treat a missing attribute as "no value", never as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Username of the photo's author
    pub username: Option<String>,
    pub camera: Option<String>,
    pub votes_count: Option<u64>,
    /// Renditions in the order the service listed them
    #[serde(default)]
    pub images: Vec<PhotoImage>,
}

impl PhotoMetadata {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Rendition at `index`, if the service returned that many
    pub fn image(&self, index: usize) -> Option<&PhotoImage> {
        self.images.get(index)
    }
}

/// Remote photo service trait
///
/// Implemented by `provider-d500px` against the 500px REST API and by test
/// doubles. The call must fail (rather than return an empty record) when the
/// service answers with nothing usable, so callers can tell "field not
/// applicable" apart from "service unavailable".
///
/// # Example
///
/// ```ignore
/// use bridge_traits::photo::PhotoService;
///
/// async fn author(service: &dyn PhotoService, id: &str) -> Result<Option<String>> {
///     Ok(service.fetch_photo(id).await?.username)
/// }
/// ```
#[async_trait]
pub trait PhotoService: Send + Sync {
    /// Fetch a single photo by its numeric identifier
    async fn fetch_photo(&self, id: &str) -> Result<PhotoMetadata>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_lookup_by_index() {
        let mut photo = PhotoMetadata::new("12345");
        photo.images = vec![
            PhotoImage::new("https://drscdn.500px.org/photo/12345/q%3D50_w%3D140/a")
                .with_size(100)
                .with_format("jpeg"),
            PhotoImage::new("https://drscdn.500px.org/photo/12345/q%3D50_w%3D280/b")
                .with_size(200)
                .with_format("jpeg"),
        ];

        assert_eq!(photo.image(1).and_then(|i| i.size), Some(200));
        assert!(photo.image(2).is_none());
    }

    #[test]
    fn test_missing_images_deserialize_to_empty() {
        let photo: PhotoMetadata =
            serde_json::from_str(r#"{"id":"12345","username":"alice"}"#).unwrap();

        assert_eq!(photo.username.as_deref(), Some("alice"));
        assert!(photo.images.is_empty());
        assert!(photo.image(1).is_none());
    }
}
