//! Logical media fields and their typed values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A field a 500px media item can expose to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaField {
    /// The matched embed block as a whole
    Shortcode,
    /// Numeric photo identifier
    Id,
    Name,
    Description,
    /// Author's username
    Username,
    Camera,
    /// Number of votes
    Votes,
    /// Remote URL of the second image rendition
    Thumbnail,
    /// Local copy of the thumbnail, downloaded on first access
    ThumbnailLocal,
    /// Where the local thumbnail copy lives, without touching disk
    ThumbnailLocalUri,
}

impl MediaField {
    pub const ALL: [MediaField; 10] = [
        MediaField::Shortcode,
        MediaField::Id,
        MediaField::Name,
        MediaField::Description,
        MediaField::Username,
        MediaField::Camera,
        MediaField::Votes,
        MediaField::Thumbnail,
        MediaField::ThumbnailLocal,
        MediaField::ThumbnailLocalUri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaField::Shortcode => "shortcode",
            MediaField::Id => "id",
            MediaField::Name => "name",
            MediaField::Description => "description",
            MediaField::Username => "username",
            MediaField::Camera => "camera",
            MediaField::Votes => "votes",
            MediaField::Thumbnail => "thumbnail",
            MediaField::ThumbnailLocal => "thumbnail_local",
            MediaField::ThumbnailLocalUri => "thumbnail_local_uri",
        }
    }

    /// Parses a host field name; unknown names yield `None`
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    /// Human-readable label shown by hosts listing provided fields
    pub fn label(&self) -> &'static str {
        match self {
            MediaField::Shortcode => "500px shortcode",
            MediaField::Id => "Picture ID",
            MediaField::Name => "Picture name",
            MediaField::Description => "Picture description",
            MediaField::Username => "Author of the picture",
            MediaField::Camera => "Name of the camera used for the picture",
            MediaField::Votes => "Number of votes",
            MediaField::Thumbnail => "Thumbnail URL",
            MediaField::ThumbnailLocal => "Local thumbnail",
            MediaField::ThumbnailLocalUri => "Local thumbnail location",
        }
    }

    /// Whether resolving this field needs the remote photo record
    pub fn is_remote(&self) -> bool {
        !matches!(self, MediaField::Shortcode | MediaField::Id)
    }
}

impl fmt::Display for MediaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Count(u64),
    Path(PathBuf),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            FieldValue::Count(count) => Some(*count),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            FieldValue::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            FieldValue::Path(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Count(count) => write!(f, "{}", count),
            FieldValue::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_parser() {
        for field in MediaField::ALL {
            assert_eq!(MediaField::from_name(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert_eq!(MediaField::from_name("exif"), None);
        assert_eq!(MediaField::from_name("Shortcode"), None);
        assert_eq!(MediaField::from_name(""), None);
    }

    #[test]
    fn test_only_shortcode_and_id_are_local() {
        let local: Vec<_> = MediaField::ALL
            .into_iter()
            .filter(|field| !field.is_remote())
            .collect();
        assert_eq!(local, vec![MediaField::Shortcode, MediaField::Id]);
    }

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::Text("alice".into()).as_text(), Some("alice"));
        assert_eq!(FieldValue::Count(42).as_count(), Some(42));
        assert_eq!(FieldValue::Count(42).as_text(), None);
        assert_eq!(
            FieldValue::Path(PathBuf::from("/tmp/1.jpg")).into_path(),
            Some(PathBuf::from("/tmp/1.jpg"))
        );
        assert_eq!(FieldValue::Count(7).to_string(), "7");
    }
}
