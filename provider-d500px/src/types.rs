//! 500px API response types
//!
//! Data structures for deserializing 500px REST v1 responses. The API is
//! loose about types (ids and sizes arrive as numbers or strings, `image_url`
//! is a string for one size and a list for several), so those fields accept
//! either form.

use bridge_traits::photo::{PhotoImage, PhotoMetadata};
use serde::{Deserialize, Serialize};

/// A JSON scalar that may be sent as number or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(u64),
    Text(String),
}

impl Scalar {
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Scalar::Number(n) => u32::try_from(*n).ok(),
            Scalar::Text(s) => s.parse().ok(),
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// One value or a list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// `GET /photos/{id}` response envelope
///
/// See: https://github.com/500px/legacy-api-documentation/blob/master/endpoints/photo/GET_photos_id.md
#[derive(Debug, Deserialize)]
pub struct PhotoResponse {
    pub photo: Option<ApiPhoto>,
}

/// 500px photo resource (the fields the media core reads)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPhoto {
    pub id: Scalar,

    pub name: Option<String>,

    pub description: Option<String>,

    pub camera: Option<String>,

    pub votes_count: Option<u64>,

    pub user: Option<ApiUser>,

    /// Rendition URLs in requested size order
    pub image_url: Option<OneOrMany<String>>,

    /// Rendition details in requested size order
    #[serde(default)]
    pub images: Vec<ApiImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiImage {
    pub size: Option<Scalar>,
    pub url: Option<String>,
    pub https_url: Option<String>,
    pub format: Option<String>,
}

/// Error body 500px sends with non-success statuses
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl ApiPhoto {
    /// Converts the resource into `PhotoMetadata`
    ///
    /// `images` wins when present; otherwise the bare `image_url` list is
    /// used (format unknown), paired with the requested sizes by position.
    /// An entry without any URL keeps its slot with an empty `url` so later
    /// renditions stay at the index the service gave them.
    pub fn into_metadata(self, requested_sizes: &[u32]) -> PhotoMetadata {
        let images: Vec<PhotoImage> = if self.images.is_empty() {
            self.image_url
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(index, url)| {
                    let image = PhotoImage::new(url);
                    match requested_sizes.get(index) {
                        Some(size) => image.with_size(*size),
                        None => image,
                    }
                })
                .collect()
        } else {
            self.images
                .into_iter()
                .map(|image| PhotoImage {
                    url: image.https_url.or(image.url).unwrap_or_default(),
                    format: image.format,
                    size: image.size.as_ref().and_then(Scalar::as_u32),
                })
                .collect()
        };

        PhotoMetadata {
            id: self.id.to_string(),
            name: self.name,
            description: self.description,
            username: self.user.and_then(|user| user.username),
            camera: self.camera,
            votes_count: self.votes_count,
            images,
        }
    }
}
