//! pgmcp server binary.

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgmcp_server::{cleanup_task, create_router, AppState, Args, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let log_filter = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pgmcp_server={},pgmcp_catalog={},tower_http=info", log_filter, log_filter)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: ServerConfig = args.into();
    let state = AppState::new(config.clone())?;

    info!(
        listen = %config.listen_addr,
        max_connections = config.max_connections,
        pool_max_connections = config.pool_max_connections,
        statement_timeout_ms = config.statement_timeout.as_millis(),
        row_counts = ?config.row_counts,
        "Starting pgmcp server"
    );

    // Close idle registered connections in the background
    let registry = state.registry.clone();
    let interval = config.cleanup_interval;
    tokio::spawn(async move {
        cleanup_task(registry, interval).await;
    });

    let app = create_router(state.clone());

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("Server listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.registry.close_all().await;
    info!("Closed all registered connections");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
