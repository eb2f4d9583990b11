//! # locus-core
//!
//! Core types and utilities shared across all Locus crates.
//!
//! This crate provides:
//! - `HttpMethod` for describing outgoing requests
//! - `LocusError` enum for unified error handling
//! - Utility functions for URL resolution, route paths and request hashing
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (HttpMethod)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{LocusError, LocusResult};
pub use types::HttpMethod;
