//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the 500px media integration:
//! - Logging and tracing infrastructure
//! - Configuration management with fail-fast validation
//!
//! ## Overview
//!
//! Every other crate in the workspace reads its settings from a
//! [`CoreConfig`](config::CoreConfig) and logs through `tracing`; this crate
//! owns both, along with the shared [`Error`] type for setup failures.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, D500pxApiConfig};
pub use error::{Error, Result};
