//! Core data types for Locus.
//!
//! This module provides the fundamental types used throughout the workspace:
//! - HTTP method type for outgoing requests

pub mod method;

// Re-export all public types
pub use method::{HttpMethod, MethodError};
