use anyhow::Result;
use std::path::PathBuf;
use clap::Parser;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use server::{run_api_server, config};

/// Blobpostd - blobpost upload server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the 'config.toml'.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dump_version();
    init_logging();

    let config = config::load(args.config).await?;

    run_api_server(config).await?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(ErrorLayer::default())
        .init();
}

fn dump_version() {
    #[cfg(debug_assertions)]
    eprintln!("Blobpost {} (debug)", env!("CARGO_PKG_VERSION"));
    #[cfg(not(debug_assertions))]
    eprintln!("Blobpost {} (release)", env!("CARGO_PKG_VERSION"));
}
