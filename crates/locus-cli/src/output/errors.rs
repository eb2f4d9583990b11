//! Error message formatting with actionable suggestions.
//!
//! The first line states the error. A `-->` line points into locus.toml for
//! parse errors, followed by an optional `help` line and the `caused by` chain.

use super::colors::ColorSupport;
use locus_core::error::LocusError;
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    #[cfg(test)]
    fn plain() -> Self {
        Self {
            colors: ColorSupport::disabled(),
        }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &LocusError) -> String {
        let mut output = String::new();

        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let LocusError::ConfigParse { line, column, .. } = error {
            if *line > 0 {
                output.push_str(&self.format_location(locus_config::CONFIG_FILE_NAME, *line, *column));
                output.push('\n');
            }
        }

        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    /// Format file location context
    pub fn format_location(&self, file: &str, line: usize, column: usize) -> String {
        format!("{} {}:{}:{}", self.colors.dim("-->"), file, line, column)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_gets_login_hint() {
        let err = LocusError::HttpStatus {
            status: 401,
            url: "http://api.test/locations".to_string(),
            body: String::new(),
        };
        let text = ErrorFormatter::plain().format_error(&err);
        assert!(text.starts_with("error: "));
        assert!(text.contains("help: "));
        assert!(text.contains("locus login"));
    }

    #[test]
    fn test_parse_error_points_at_config_file() {
        let err = LocusError::ConfigParse {
            message: "expected `=`".to_string(),
            line: 3,
            column: 7,
        };
        let text = ErrorFormatter::plain().format_error(&err);
        assert!(text.contains("--> locus.toml:3:7"));
    }

    #[test]
    fn test_source_chain_is_printed() {
        let err = LocusError::io(
            "Failed to write locus.toml".to_string(),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        );
        let text = ErrorFormatter::plain().format_error(&err);
        assert!(text.contains("caused by: read-only"));
    }
}
