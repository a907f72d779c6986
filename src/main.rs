//! Static asset proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                     ASSET PROXY                       │
//!                   │                                                       │
//!  Client Request   │  ┌──────────┐   ┌──────────────┐   ┌──────────────┐  │
//!  ─────────────────┼─▶│   http   │──▶│ AssetService │──▶│  forwarder   │  │
//!                   │  │ dispatch │   │ (404 on err) │   │  + rewrite   │  │
//!                   │  └──────────┘   └──────────────┘   └──────┬───────┘  │
//!                   │                                           │          │
//!                   │                                           ▼          │
//!  Client Response  │                                    ┌──────────────┐  │
//!  ◀────────────────┼────────────────────────────────────│    Fetch     │◀─┼──── static.spin.internal
//!                   │                                    └──────────────┘  │
//!                   │  config · observability · lifecycle                   │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use asset_proxy::config::{load_config, validate_config, ConfigError, ProxyConfig};
use asset_proxy::lifecycle;
use asset_proxy::observability::logging::init_logging;

#[derive(Debug, Parser)]
#[command(name = "asset-proxy")]
#[command(about = "Forward every request to the internal static asset host", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability)?;

    tracing::info!("asset-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        internal_host = %config.upstream.internal_host,
        static_root = %config.upstream.static_root,
        services = config.upstream.resolve.len(),
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
