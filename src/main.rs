use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use foodstore::api::auth::hash_password;
use foodstore::config::Config;
use foodstore::engine::OrderWorker;
use foodstore::store::{seeders, Store};
use foodstore::AppState;

#[derive(Parser, Debug)]
#[command(name = "foodstore")]
#[command(author, version, about = "A small catalog and ordering service", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "foodstore.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the listen port
    #[arg(short, long, env = "FOODSTORE_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting foodstore v{}", env!("CARGO_PKG_VERSION"));

    // Create the order queue and the store that feeds it
    let (order_tx, order_rx) = mpsc::channel(config.worker.queue_capacity);
    let store = Store::new(order_tx);

    if config.seed.enabled {
        let demo_hash = hash_password(&config.seed.demo_password)
            .map_err(|e| anyhow::anyhow!("Failed to hash demo password: {}", e))?;
        seeders::seed_demo_data(&store, &demo_hash).context("Failed to seed demo data")?;
    }

    // Start the order worker
    let worker = OrderWorker::from_config(order_rx, &config.worker);
    tokio::spawn(worker.run());

    let addr = config.listen_addr();
    let state = Arc::new(AppState::new(config, store));
    let app = foodstore::api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Orders still queued are dropped with the process
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
