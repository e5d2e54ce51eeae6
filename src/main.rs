// Main entrypoint for the procman supervisor.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::error;

use procman::app::App;
use procman::config::{Config, DEFAULT_PORT};
use procman::shutdown::GracefulShutdown;

/// procman - HTTP-controlled process supervisor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listening port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Services file path (JSON array of {name, command, env?})
    #[arg(short, long, value_name = "FILE")]
    services: Option<PathBuf>,
}

/// Configures structured logging with an env-filter override.
fn configure_logger() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    configure_logger();

    tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?
        .block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    let cfg = Config::resolve(args.port, args.services);

    let graceful_shutdown = GracefulShutdown::new(shutdown_token.clone(), Duration::from_secs(10));

    let app = App::new(shutdown_token.clone(), &cfg)?;

    graceful_shutdown.add(1);

    let graceful_done = Arc::new(graceful_shutdown.clone());
    app.serve(graceful_done).await?;

    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}
