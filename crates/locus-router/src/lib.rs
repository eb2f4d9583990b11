//! Client-side routing for the Locus dashboard
//!
//! Maps a requested location to the page that mounts for it. Routes are
//! declared once at startup as a tree one level deep (layout → pages) and
//! never change afterwards.
//!
//! # Data Flow
//! ```text
//! location ("/compare?city=oslo")
//!     → normalize_route_path ("/compare")
//!     → RouteTable::resolve (first exact match in declaration order)
//!     → RouteMatch { layout: Some(Layout), page: Compare } or None
//! ```

pub mod table;
pub mod history;

// Re-export main types
pub use table::{app_route_entries, Component, RouteEntry, RouteMatch, RouteTable};
pub use history::History;

use locus_core::error::LocusError;

/// Result type for routing operations
pub type RouterResult<T> = Result<T, LocusError>;
