//! Configuration parsing for the Locus client
//!
//! This crate handles parsing and validation of locus.toml and layering of
//! environment and command-line overrides on top of it.

pub mod toml;
pub mod merge;

// Re-export main types
pub use toml::{ClientSection, LocusToml};
pub use merge::{ConfigLoader, ConfigLayering, ConfigSource};

use locus_core::error::LocusError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, LocusError>;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "locus.toml";

/// Environment variable that supplies the API base URL
pub const API_URL_ENV: &str = "LOCUS_API_URL";
