//! URL resolution against the configured API base.

use crate::error::{LocusError, LocusResult};

/// True when the target carries its own scheme (`http://…`, `https://…`)
pub fn is_absolute_url(target: &str) -> bool {
    match target.find("://") {
        Some(idx) if idx > 0 => target[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Resolve a request target against an optional base URL.
///
/// Absolute targets are used unchanged. Relative targets are appended to the
/// base with exactly one `/` between them. Without a base, a relative target
/// cannot be dispatched.
pub fn resolve_url(base: Option<&str>, target: &str) -> LocusResult<url::Url> {
    let combined = if is_absolute_url(target) {
        target.to_string()
    } else {
        let base = base.ok_or_else(|| LocusError::MissingBaseUrl {
            target: target.to_string(),
        })?;
        if target.is_empty() {
            base.to_string()
        } else {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                target.trim_start_matches('/')
            )
        }
    };

    url::Url::parse(&combined).map_err(|e| LocusError::InvalidRequest {
        message: format!("Invalid URL '{}': {}", combined, e),
    })
}
