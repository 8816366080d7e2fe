mod controllers;
mod error;
mod protocol;
mod router;
mod server;

use std::path::PathBuf;

use clap::Parser;
use router::Router;
use server::HttpServer;
use valorant_store::config::CONFIG_ENV;
use valorant_store::{AppConfig, Backend, RepositoryFactory};

/// HTTP front end for the Valorant reference data.
#[derive(Parser, Debug)]
#[command(name = "valorant-server", version, about)]
struct Args {
    /// TOML configuration file (defaults to $VALORANT_CONFIG, then ./valorant.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, default_value_t = 80)]
    port: u16,

    /// Override the configured backend (file, sql or orm)
    #[arg(long)]
    backend: Option<Backend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with span durations
    use tracing_subscriber::fmt::format::FmtSpan;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let config_path = args
        .config
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));
    let mut config = AppConfig::load_from(config_path.as_deref(), |key| std::env::var(key).ok())?;
    if let Some(backend) = args.backend {
        config.backend = backend;
    }

    tracing::info!(backend = %config.backend, "Starting Valorant HTTP server");

    let repos = RepositoryFactory::build(&config).await?;
    let router = Router::new(&repos);

    let server = HttpServer::bind(&format!("0.0.0.0:{}", args.port), router).await?;
    server.run().await?;

    Ok(())
}
