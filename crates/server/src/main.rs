use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use where_is_bus_server::{Config, Server, seed};
use where_is_bus_tracking::{IdAllocator, MemoryStore, TrackingService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if config.verbose { "debug" } else { "info" })),
        )
        .init();

    let routes = match &config.routes {
        Some(path) => seed::load_routes(path)?,
        None => {
            tracing::warn!("No route file given; every registration will report Route not found");
            Vec::new()
        }
    };
    tracing::info!(routes = routes.len(), "Loaded routes");

    let store = Arc::new(MemoryStore::from_routes(routes));
    let allocator = IdAllocator::new().with_max_attempts(config.max_id_attempts.get());
    let service = Arc::new(TrackingService::new(store).with_allocator(allocator));

    let server = Server::bind(config.bind, service)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!("Server running on http://{}", server.local_addr()?);

    server.serve(shutdown_signal()).await.context("Server error")?;

    tracing::info!("Server stopped; live tracking state discarded");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Unable to listen for Ctrl-C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
