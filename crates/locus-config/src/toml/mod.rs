//! locus.toml configuration parsing and serialization

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use locus_core::error::LocusError;
use crate::ConfigResult;

/// Per-attempt request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Lifetime of a cached GET response
pub const DEFAULT_CACHE_TTL_MS: u64 = 60_000;
/// Retries after the first attempt for network failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Fixed pause between retry attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
/// Local storage key holding the bearer token
pub const DEFAULT_TOKEN_KEY: &str = "auth_token";

const MAX_RETRIES_LIMIT: u32 = 10;

/// Complete locus.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocusToml {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientSection,
}

/// `[client]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Base URL prepended to relative request targets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Response cache time-to-live in milliseconds
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Maximum retries on network failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Local storage key for the bearer token
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Directory holding the local storage file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<Utf8PathBuf>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            api_base_url: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            token_key: default_token_key(),
            storage_dir: None,
        }
    }
}

impl ClientSection {
    /// Storage directory, falling back to `~/.locus`
    pub fn resolved_storage_dir(&self) -> ConfigResult<Utf8PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }

        let home_dir = dirs::home_dir().ok_or_else(|| LocusError::ConfigValidation {
            field: "storage_dir".to_string(),
            reason: "Could not determine home directory".to_string(),
        })?;

        let home = Utf8PathBuf::try_from(home_dir).map_err(|e| LocusError::ConfigValidation {
            field: "storage_dir".to_string(),
            reason: format!("Invalid home directory path: {}", e),
        })?;

        Ok(home.join(".locus"))
    }
}

/// Parse TOML string to LocusToml configuration
pub fn parse_locus_toml(content: &str) -> ConfigResult<LocusToml> {
    // First try with toml_edit for better error reporting
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| parse_error(content, e.message(), e.span()))?;

    // Then parse with serde for type safety
    let config: LocusToml = toml::from_str(content)
        .map_err(|e| parse_error(content, e.message(), e.span()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Serialize LocusToml to TOML string
pub fn serialize_locus_toml(config: &LocusToml) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| LocusError::ConfigParse {
        message: format!("TOML serialization error: {}", e),
        line: 0,
        column: 0,
    })
}

/// Validate configuration completeness
pub fn validate_config(config: &LocusToml) -> ConfigResult<()> {
    let client = &config.client;

    if let Some(base) = &client.api_base_url {
        validate_base_url(base)?;
    }

    if client.timeout_ms == 0 {
        return Err(LocusError::ConfigValidation {
            field: "client.timeout_ms".to_string(),
            reason: "Timeout must be greater than zero".to_string(),
        });
    }

    if client.cache_ttl_ms == 0 {
        return Err(LocusError::ConfigValidation {
            field: "client.cache_ttl_ms".to_string(),
            reason: "Cache TTL must be greater than zero".to_string(),
        });
    }

    if client.max_retries > MAX_RETRIES_LIMIT {
        return Err(LocusError::ConfigValidation {
            field: "client.max_retries".to_string(),
            reason: format!("At most {} retries are allowed, got {}", MAX_RETRIES_LIMIT, client.max_retries),
        });
    }

    if client.token_key.trim().is_empty() {
        return Err(LocusError::ConfigValidation {
            field: "client.token_key".to_string(),
            reason: "Token key must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Load and parse locus.toml from file path
pub async fn load_from_file(path: &Utf8Path) -> ConfigResult<LocusToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LocusError::io(format!("Failed to read {}", path), e))?;

    parse_locus_toml(&content).map_err(|e| match e {
        LocusError::ConfigParse { message, line, column } => LocusError::ConfigParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        LocusError::ConfigValidation { field, reason } => LocusError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    })
}

/// The base URL must be absolute http(s)
fn validate_base_url(base: &str) -> ConfigResult<()> {
    let parsed = url::Url::parse(base).map_err(|e| LocusError::ConfigValidation {
        field: "client.api_base_url".to_string(),
        reason: format!("'{}' is not a valid URL: {}", base, e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LocusError::ConfigValidation {
            field: "client.api_base_url".to_string(),
            reason: format!("Unsupported scheme '{}', expected http or https", parsed.scheme()),
        });
    }

    Ok(())
}

/// Convert a byte span into 1-based line/column
fn parse_error(content: &str, message: &str, span: Option<std::ops::Range<usize>>) -> LocusError {
    let (line, column) = match span {
        Some(span) => {
            let prefix = &content[..span.start.min(content.len())];
            let line = prefix.matches('\n').count() + 1;
            let column = prefix.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) + 1;
            (line, column)
        }
        None => (0, 0),
    };

    LocusError::ConfigParse {
        message: message.trim().to_string(),
        line,
        column,
    }
}
