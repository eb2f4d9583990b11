//! Utility functions and helpers.
//!
//! Common functionality used across multiple Locus crates.

pub mod hash;
pub mod path;
pub mod url;

// Re-export commonly used utilities
pub use hash::request_key;
pub use path::{join_route_path, normalize_route_path};
pub use url::{is_absolute_url, resolve_url};
