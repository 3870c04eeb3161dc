//! # 500px Provider
//!
//! Implements the `PhotoService` trait for the 500px REST API v1.
//!
//! ## Overview
//!
//! This module provides:
//! - Photo lookups by id with the thumbnail renditions the media core needs
//! - Mapping of the 500px photo resource onto `PhotoMetadata`
//! - Single-attempt requests; a failed lookup is reported, never retried

pub mod client;
pub mod error;
pub mod types;

pub use client::D500pxClient;
pub use error::{D500pxError, Result};
