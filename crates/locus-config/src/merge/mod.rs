//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;
use camino::{Utf8Path, Utf8PathBuf};
use locus_core::error::LocusError;
use crate::{toml::LocusToml, ConfigResult, API_URL_ENV, CONFIG_FILE_NAME};

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Project locus.toml file
    ProjectToml(Utf8PathBuf),
    /// No file found, built-in defaults
    Defaults,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Load project configuration, falling back to defaults
    pub async fn load_project_config(&self) -> ConfigResult<(LocusToml, ConfigSource)> {
        match self.find_config_path(CONFIG_FILE_NAME) {
            Some(path) => {
                let config = crate::toml::load_from_file(&path).await?;
                Ok((config, ConfigSource::ProjectToml(path)))
            }
            None => Ok((LocusToml::default(), ConfigSource::Defaults)),
        }
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn find_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current: Option<&Utf8Path> = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.exists() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }
}

impl ConfigLayering {
    /// Merge the file layer with environment and CLI overrides.
    ///
    /// Precedence, lowest first: file, environment, command line.
    pub fn merge_configs(
        project_config: LocusToml,
        env_overrides: &HashMap<String, String>,
        cli_overrides: &HashMap<String, String>,
    ) -> ConfigResult<LocusToml> {
        let mut merged = project_config;

        Self::apply_env_overrides(&mut merged, env_overrides)?;
        Self::apply_cli_overrides(&mut merged, cli_overrides)?;

        crate::toml::validate_config(&merged)?;

        Ok(merged)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: &mut LocusToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                API_URL_ENV => {
                    config.client.api_base_url = non_empty(value);
                }
                "LOCUS_STORAGE_DIR" => {
                    config.client.storage_dir = non_empty(value).map(Utf8PathBuf::from);
                }
                "LOCUS_TIMEOUT_MS" => {
                    config.client.timeout_ms = parse_number(key, value)?;
                }
                "LOCUS_CACHE_TTL_MS" => {
                    config.client.cache_ttl_ms = parse_number(key, value)?;
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Apply CLI flag overrides
    fn apply_cli_overrides(config: &mut LocusToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "api_base_url" => {
                    config.client.api_base_url = non_empty(value);
                }
                "storage_dir" => {
                    config.client.storage_dir = non_empty(value).map(Utf8PathBuf::from);
                }
                "timeout_ms" => {
                    config.client.timeout_ms = parse_number(key, value)?;
                }
                _ => {
                    // Unknown CLI override, ignore
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with("LOCUS_"))
            .collect()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_number(field: &str, value: &str) -> ConfigResult<u64> {
    value.trim().parse().map_err(|e| LocusError::ConfigValidation {
        field: field.to_string(),
        reason: format!("Expected a whole number of milliseconds, got '{}': {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_utf8(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_config_loader_creation() {
        let cwd = Utf8PathBuf::from("/test");
        let loader = ConfigLoader::new(cwd.clone());
        assert_eq!(loader.cwd, cwd);
    }

    #[tokio::test]
    async fn test_find_config_path_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_utf8(&temp_dir);

        let locus_toml_path = temp_path.join("locus.toml");
        tokio::fs::write(&locus_toml_path, "[client]\nmax_retries = 2\n").await.unwrap();

        let nested = temp_path.join("pages").join("compare");
        tokio::fs::create_dir_all(&nested).await.unwrap();

        let loader = ConfigLoader::new(nested);
        assert_eq!(loader.find_config_path("locus.toml"), Some(locus_toml_path));
    }

    #[tokio::test]
    async fn test_load_project_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_utf8(&temp_dir);

        let content = r#"
[client]
api_base_url = "http://localhost:3000/api"
"#;
        tokio::fs::write(temp_path.join("locus.toml"), content).await.unwrap();

        let loader = ConfigLoader::new(temp_path);
        let (config, source) = loader.load_project_config().await.unwrap();

        assert_eq!(config.client.api_base_url.as_deref(), Some("http://localhost:3000/api"));
        assert!(matches!(source, ConfigSource::ProjectToml(_)));
    }

    #[tokio::test]
    async fn test_load_project_config_without_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new(temp_utf8(&temp_dir));

        // A locus.toml in an ancestor of the temp dir would be picked up; skip in that case.
        if loader.find_config_path(CONFIG_FILE_NAME).is_some() {
            return;
        }

        let (config, source) = loader.load_project_config().await.unwrap();
        assert_eq!(config, LocusToml::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[tokio::test]
    async fn test_invalid_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_utf8(&temp_dir);
        tokio::fs::write(temp_path.join("locus.toml"), "[client]\ntimeout_ms = 0\n").await.unwrap();

        let loader = ConfigLoader::new(temp_path);
        match loader.load_project_config().await.unwrap_err() {
            LocusError::ConfigValidation { reason, .. } => assert!(reason.contains("locus.toml")),
            other => panic!("Expected ConfigValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut env = HashMap::new();
        env.insert("LOCUS_API_URL".to_string(), "https://api.example.com".to_string());
        env.insert("LOCUS_TIMEOUT_MS".to_string(), "1500".to_string());
        env.insert("LOCUS_UNRELATED".to_string(), "ignored".to_string());

        let merged = ConfigLayering::merge_configs(LocusToml::default(), &env, &HashMap::new()).unwrap();
        assert_eq!(merged.client.api_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(merged.client.timeout_ms, 1500);
    }

    #[test]
    fn test_empty_api_url_clears_base() {
        let mut config = LocusToml::default();
        config.client.api_base_url = Some("https://api.example.com".to_string());

        let mut env = HashMap::new();
        env.insert("LOCUS_API_URL".to_string(), "".to_string());

        let merged = ConfigLayering::merge_configs(config, &env, &HashMap::new()).unwrap();
        assert!(merged.client.api_base_url.is_none());
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let mut env = HashMap::new();
        env.insert("LOCUS_API_URL".to_string(), "https://env.example.com".to_string());

        let mut cli = HashMap::new();
        cli.insert("api_base_url".to_string(), "https://cli.example.com".to_string());

        let merged = ConfigLayering::merge_configs(LocusToml::default(), &env, &cli).unwrap();
        assert_eq!(merged.client.api_base_url.as_deref(), Some("https://cli.example.com"));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut env = HashMap::new();
        env.insert("LOCUS_CACHE_TTL_MS".to_string(), "soon".to_string());
        assert!(ConfigLayering::merge_configs(LocusToml::default(), &env, &HashMap::new()).is_err());

        let mut env = HashMap::new();
        env.insert("LOCUS_API_URL".to_string(), "localhost".to_string());
        assert!(ConfigLayering::merge_configs(LocusToml::default(), &env, &HashMap::new()).is_err());
    }
}
