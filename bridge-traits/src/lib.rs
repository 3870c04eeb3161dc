//! # Host Bridge Traits
//!
//! Abstraction traits the 500px media core requires from its host.
//!
//! ## Overview
//!
//! This crate defines the contract between the media core and the
//! implementations supplied by a host (a CMS, a CLI, a test harness). Each
//! trait represents a capability the core needs but must not hard-wire:
//!
//! ### Networking & I/O
//! - [`HttpClient`](http::HttpClient) - Async single-attempt HTTP GET
//! - [`FileSystemAccess`](storage::FileSystemAccess) - File I/O for the thumbnail cache
//!
//! ### Remote services
//! - [`PhotoService`](photo::PhotoService) - Fetch photo metadata from 500px
//!
//! ### Utilities
//! - [`LoggerSink`](logger::LoggerSink) - Forward structured logs to host logging
//!
//! ## Implementations
//!
//! | Capability | Implementation | Crate |
//! |------------|----------------|-------|
//! | `HttpClient` | `ReqwestHttpClient` | `bridge-desktop` |
//! | `FileSystemAccess` | `TokioFileSystem` | `bridge-desktop` |
//! | `PhotoService` | `D500pxClient` | `provider-d500px` |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type for consistent
//! error handling. Implementations should:
//!
//! - Convert implementation-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., file paths, photo IDs)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so a single resolver can be
//! shared by concurrent render requests.
//!
//! ## Examples
//!
//! ### Implementing PhotoService
//!
//! ```ignore
//! use bridge_traits::photo::{PhotoMetadata, PhotoService};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct FixturePhotos;
//!
//! #[async_trait]
//! impl PhotoService for FixturePhotos {
//!     async fn fetch_photo(&self, id: &str) -> Result<PhotoMetadata> {
//!         Ok(PhotoMetadata::new(id))
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logger;
pub mod photo;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use logger::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use photo::{PhotoImage, PhotoMetadata, PhotoService};
pub use storage::FileSystemAccess;
