//! `locus init` command implementation.
//!
//! Writes a locus.toml with the default client settings into the current
//! directory. An existing file is left alone.

use locus_config::toml::serialize_locus_toml;
use locus_config::{LocusToml, CONFIG_FILE_NAME};
use locus_core::error::{LocusError, LocusResult};

use super::CommandContext;

/// Execute the `locus init` command
pub async fn execute(ctx: &CommandContext) -> LocusResult<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        ctx.output.info(&format!("{} already exists, skipping initialization", CONFIG_FILE_NAME));
        return Ok(());
    }

    let mut config = LocusToml::default();
    // Carry an explicitly supplied base URL into the new file
    config.client.api_base_url = ctx.config.client.api_base_url.clone();

    let content = serialize_locus_toml(&config)?;
    tokio::fs::write(&config_path, content)
        .await
        .map_err(|e| LocusError::io(format!("Failed to write {}", config_path), e))?;

    ctx.output.success(&format!("Created {}", config_path));
    if config.client.api_base_url.is_none() {
        ctx.output.info("Set client.api_base_url to send relative requests");
    }

    Ok(())
}
