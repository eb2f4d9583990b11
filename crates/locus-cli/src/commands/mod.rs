//! Command implementations and dispatch logic.
//!
//! Every handler takes a [`CommandContext`] carrying the merged configuration.

use std::collections::HashMap;
use std::sync::Arc;

use camino::Utf8PathBuf;
use locus_client::{ApiClient, FileStore, TokenStore};
use locus_config::{ConfigLayering, ConfigLoader, ConfigSource, LocusToml};
use locus_core::error::{LocusError, LocusResult};
use tracing::info;

pub mod config;
pub mod init;
pub mod login;
pub mod request;
pub mod route;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    /// File, environment and flag layers merged
    pub config: LocusToml,
    pub config_source: ConfigSource,
}

impl CommandContext {
    /// Load locus.toml from the working directory upwards and apply overrides
    pub async fn new(cli_overrides: &HashMap<String, String>) -> LocusResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| LocusError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| LocusError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("Working directory is not valid UTF-8: {}", e),
        })?;

        let (project, config_source) = ConfigLoader::new(cwd.clone()).load_project_config().await?;
        let env_overrides = ConfigLayering::collect_env_overrides();
        let config = ConfigLayering::merge_configs(project, &env_overrides, cli_overrides)?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            config,
            config_source,
        })
    }

    /// API client built from the merged `[client]` section
    pub fn client(&self) -> LocusResult<ApiClient> {
        ApiClient::with_config(&self.config.client)
    }

    /// Local storage the client reads its bearer token from
    pub fn token_store(&self) -> LocusResult<Arc<dyn TokenStore>> {
        let dir = self.config.client.resolved_storage_dir()?;
        Ok(Arc::new(FileStore::in_dir(&dir)))
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> LocusResult<()> {
    match command {
        Commands::Get { url, no_cache } => {
            info!("GET {} (no_cache: {})", url, no_cache);
            request::get(url, no_cache, ctx).await
        }
        Commands::Request { method, url, data } => {
            info!("{} {}", method, url);
            request::execute(method, url, data, ctx).await
        }
        Commands::Route { path } => route::resolve(path, ctx).await,
        Commands::Routes => route::list(ctx).await,
        Commands::Login { token } => {
            info!("Storing bearer token");
            login::login(token, ctx).await
        }
        Commands::Logout => login::logout(ctx).await,
        Commands::Init => {
            info!("Initializing locus.toml in current directory");
            init::execute(ctx).await
        }
        Commands::Config => config::show(ctx).await,
        Commands::Version => show_version(ctx).await,
    }
}

async fn show_version(ctx: &CommandContext) -> LocusResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.print(&format!("locus v{}", version));
    ctx.output.info(&format!("Built: {}", build_date));
    ctx.output.info(&format!("Target: {}", target));
    ctx.output.info(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}
