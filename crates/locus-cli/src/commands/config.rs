//! `locus config`

use locus_config::ConfigSource;
use locus_core::error::LocusResult;

use super::CommandContext;

/// Print the merged client configuration and where it came from
pub async fn show(ctx: &CommandContext) -> LocusResult<()> {
    let client = &ctx.config.client;

    match &ctx.config_source {
        ConfigSource::ProjectToml(path) => ctx.output.info(&format!("Loaded from {}", path)),
        ConfigSource::Defaults => ctx.output.info("No locus.toml found, using defaults"),
    }

    let base = client.api_base_url.as_deref().unwrap_or("(none)");
    ctx.output.print(&format!("api_base_url   = {}", base));
    ctx.output.print(&format!("timeout_ms     = {}", client.timeout_ms));
    ctx.output.print(&format!("cache_ttl_ms   = {}", client.cache_ttl_ms));
    ctx.output.print(&format!("max_retries    = {}", client.max_retries));
    ctx.output.print(&format!("retry_delay_ms = {}", client.retry_delay_ms));
    ctx.output.print(&format!("token_key      = {}", client.token_key));
    ctx.output.print(&format!("storage_dir    = {}", client.resolved_storage_dir()?));

    Ok(())
}
