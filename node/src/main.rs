// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use scorekeeper_node::config::NodeConfig;
use scorekeeper_node::errors::NodeError;
use scorekeeper_node::server::build_router;
use scorekeeper_node::state::{AppState, Stores};
use scorekeeper_node::telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    telemetry::init_telemetry()?;

    let cfg = NodeConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        e
    })?;
    tracing::info!("Initializing scorekeeper node with config: {:?}", cfg);

    std::fs::create_dir_all(&cfg.data_dir)?;
    let stores = Stores::open(&cfg)?;
    let app = build_router(AppState::new(stores, &cfg), &cfg.route_prefixes);

    let listener = TcpListener::bind(cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, prefixes = ?cfg.route_prefixes, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
