use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use cytoscreen::config::DEFAULT_BIND;
use cytoscreen::{init_logger, web, ServerConfig};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the scaler and model artifacts (defaults to $CYTOSCREEN_ARTIFACTS or the working directory)
    #[arg(short, long)]
    artifacts_dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Verify artifact checksums against manifest.json before loading
    #[arg(long)]
    verify: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            bind_addr: self.bind,
            artifacts_dir: self.artifacts_dir.unwrap_or(defaults.artifacts_dir),
            verify_checksums: self.verify,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let config = Args::parse().into_config();

    info!("=== Starting cytoscreen ===");
    let dispatcher = config
        .load_dispatcher()
        .with_context(|| format!("failed to load artifacts from {}", config.artifacts_dir.display()))?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    web::serve(listener, Arc::new(dispatcher), web::shutdown_signal())
        .await
        .context("server error")?;

    info!("=== Server stopped ===");
    Ok(())
}
