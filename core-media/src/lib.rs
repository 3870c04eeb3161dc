//! # 500px Media Module
//!
//! Recognises 500px embed codes and turns them into media fields.
//!
//! ## Overview
//!
//! This module handles:
//! - Embed code matching and photo id extraction ([`embed`])
//! - Field resolution, optionally enriched by the 500px API ([`resolver`])
//! - Write-once local thumbnail caching ([`thumbnail`])
//! - Embed code validation for host forms ([`validation`])
//! - Allow-listed rendering of stored embed markup ([`formatter`])
//! - The host-facing media type tying the above together ([`media_type`])

pub mod embed;
pub mod error;
pub mod fields;
pub mod formatter;
pub mod media_type;
pub mod resolver;
pub mod thumbnail;
pub mod validation;

pub use embed::{EmbedMatcher, EmbedPattern, MatchResult};
pub use error::{MediaError, Result};
pub use fields::{FieldValue, MediaField};
pub use formatter::{EmbedFormatter, RenderedEmbed, ALLOWED_TAGS};
pub use media_type::{D500pxMediaType, MediaRecord, MediaTypeConfig};
pub use resolver::MetadataResolver;
pub use thumbnail::ThumbnailCache;
pub use validation::{is_valid_embed, ConstraintViolation, EmbedCodeValidator};
