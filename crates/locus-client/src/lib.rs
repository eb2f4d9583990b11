//! HTTP API client for Locus
//!
//! Every call made through [`ApiClient`] passes the same pipeline: GET responses
//! are served from a short-lived cache, a bearer token is read from local
//! storage and attached, and requests that never received a response are
//! retried a bounded number of times.

pub mod client;
pub mod api;
pub mod auth;
pub mod cache;

// Re-export main types
pub use client::{ApiClient, ApiClientBuilder, RetryConfig};
pub use api::{ApiResponse, RequestDescriptor};
pub use auth::{FileStore, MemoryStore, TokenStore};
pub use cache::{CacheEntry, CacheStats, ResponseCache};

use locus_core::error::LocusError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, LocusError>;
