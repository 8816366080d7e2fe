mod back_office;
mod console;
mod error;
mod forms;
mod manager;

use back_office::BackOffice;
use console::Console;
use tokio::io::BufReader;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use valorant_store::{AppConfig, RepositoryFactory};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout belongs to the menus; logs go to a daily file
    let log_dir = std::path::Path::new("logs");
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "valorant-backoffice");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    tracing::info!(backend = %config.backend, "Back office starting up");

    let repos = RepositoryFactory::build(&config).await?;
    let back_office = BackOffice::new(&repos);

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    back_office.run(&mut console).await?;

    tracing::info!("Back office shutting down");
    Ok(())
}
