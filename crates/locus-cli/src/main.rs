//! # locus-cli
//!
//! Command-line front end for the Locus dashboard client.
//!
//! Issues requests through the same API pipeline the pages use, resolves
//! client-side routes, and manages the stored bearer token.

use clap::{Parser, Subcommand};
use locus_core::error::{LocusError, LocusResult};
use std::collections::HashMap;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Locus dashboard client
#[derive(Parser)]
#[command(name = "locus", version, about = "Locus dashboard API client and route table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides LOCUS_API_URL and locus.toml)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Directory holding local storage
    #[arg(long, global = true, value_name = "DIR")]
    pub storage_dir: Option<String>,

    /// Per-attempt request timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// GET a URL through the API client
    Get {
        url: String,
        /// Skip the response cache
        #[arg(long)]
        no_cache: bool,
    },
    /// Send a request with any method
    Request {
        method: String,
        url: String,
        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Show which page a location mounts
    Route {
        path: String,
    },
    /// List all routes
    Routes,
    /// Store a bearer token in local storage
    Login {
        #[arg(long)]
        token: String,
    },
    /// Remove the stored bearer token
    Logout,
    /// Write a locus.toml in the current directory
    Init,
    /// Show the resolved configuration
    Config,
    /// Show version information
    Version,
}

impl Cli {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(url) = &self.api_url {
            overrides.insert("api_base_url".to_string(), url.clone());
        }
        if let Some(dir) = &self.storage_dir {
            overrides.insert("storage_dir".to_string(), dir.clone());
        }
        if let Some(timeout) = self.timeout_ms {
            overrides.insert("timeout_ms".to_string(), timeout.to_string());
        }
        overrides
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting Locus CLI v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run_cli(cli) {
        error!("Command failed: {}", err);
        eprint!("{}", ErrorFormatter::new().format_error(&err));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> LocusResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| LocusError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(&cli.overrides()).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "locus_cli={level},locus_client={level},locus_config={level},locus_router={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Locus encountered an unexpected error: {}", panic_info);
        eprintln!("Locus crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/locus-app/locus/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
