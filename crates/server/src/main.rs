use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

mod api;
mod config;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "coursegate")]
#[command(about = "MCP gateway for the Coursegate learning platform", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "coursegate.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "COURSEGATE_PORT", default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "COURSEGATE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Backend base URL, overrides `[backend].base_url`
    #[arg(long, env = "COURSEGATE_BACKEND_URL")]
    backend_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coursegate=info,tower_http=debug".into());

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    tracing::info!("Starting Coursegate MCP gateway");

    let mut config = ServerConfig::load(&args.config)?;
    if let Some(url) = args.backend_url {
        config.backend.base_url = url;
    }
    tracing::info!(backend = %config.backend.base_url, "Backend configured");

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                return;
            }
            tracing::info!("Shutdown requested");
            shutdown.cancel();
        }
    });

    let addr = format!("{}:{}", args.host, args.port);
    tracing::info!("Starting API server on {}", addr);

    api::serve(&addr, config, shutdown).await?;

    tracing::info!("Gateway stopped");
    Ok(())
}
