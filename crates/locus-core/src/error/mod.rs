//! Error types and result aliases for Locus operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the Locus crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all Locus operations
#[derive(Error, Debug)]
pub enum LocusError {
    // Config errors
    #[error("Failed to parse locus.toml: {message} at line {line}, column {column}")]
    ConfigParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Request pipeline errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Request to {url} failed with status {status}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("'{target}' is relative and no API base URL is configured")]
    MissingBaseUrl { target: String },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Local storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Routing errors
    #[error("No route matches '{path}'")]
    RouteNotFound { path: String },

    #[error("Invalid route table: {reason}")]
    RouteTable { reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Locus operations
pub type LocusResult<T> = Result<T, LocusError>;

impl LocusError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create a storage error from any error type
    pub fn storage<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// True when no HTTP response was received at all.
    ///
    /// This is the only class of failure the request pipeline retries.
    pub fn is_network_error(&self) -> bool {
        matches!(self, LocusError::Network { .. } | LocusError::Timeout { .. })
    }

    /// HTTP status of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            LocusError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            LocusError::Network { .. } => Some("Check your internet connection and try again"),
            LocusError::Timeout { .. } => {
                Some("The API is slow to respond; raise timeout_ms in locus.toml if this persists")
            },
            LocusError::HttpStatus { status: 401, .. } | LocusError::HttpStatus { status: 403, .. } => {
                Some("Run 'locus login --token <TOKEN>' to store a valid credential")
            },
            LocusError::MissingBaseUrl { .. } => {
                Some("Set LOCUS_API_URL or api_base_url in locus.toml, or pass an absolute URL")
            },
            LocusError::RouteNotFound { .. } => Some("Run 'locus routes' to list the known routes"),
            LocusError::ConfigParse { .. } | LocusError::ConfigValidation { .. } => {
                Some("Fix the reported field in locus.toml")
            },
            _ => None,
        }
    }
}
