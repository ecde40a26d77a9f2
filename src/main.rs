use anyhow::{Context, Result};
use std::sync::Arc;
use steelpulse::alerts::AlertEngine;
use steelpulse::api::create_app;
use steelpulse::config::resolve_config;
use steelpulse::simulation::run_simulation;
use steelpulse::state::PlantStore;
use steelpulse::subscription::BroadcastHub;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steelpulse=info".into()),
        )
        .init();

    info!("SteelPulse starting...");

    let config = resolve_config().context("Invalid configuration")?;
    info!(
        bind = %config.server.bind,
        tick_interval_ms = config.simulation.tick_interval_ms,
        push_interval_ms = config.broadcast.push_interval_ms,
        noise_scale = config.simulation.noise_scale,
        history_capacity = config.history.capacity,
        furnace_cooldown_secs = config.alerts.furnace_cooldown_secs,
        "Configuration loaded"
    );

    let store = Arc::new(PlantStore::seeded(&config.history));
    let alert_engine = AlertEngine::new(&config.alerts)?;

    // Simulation tick (sole writer of simulated values)
    let simulation_handle = tokio::spawn(run_simulation(
        Arc::clone(&store),
        alert_engine,
        config.simulation.clone(),
    ));

    let hub = Arc::new(BroadcastHub::new(
        Arc::clone(&store),
        config.broadcast.push_interval(),
    ));
    let app = create_app(Arc::clone(&store), hub);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(bind = %config.server.bind, "HTTP/WebSocket API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shutdown signal received");
    simulation_handle.abort();
    info!("SteelPulse stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl_c signal");
        std::future::pending::<()>().await;
    }
}
