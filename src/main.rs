use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::app_config::AppConfig, service::shutdown::shutdown_signal};

mod api;
mod config;
mod db;
mod models;
mod service;
#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = match AppConfig::load() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    // Connect, migrate and mount the configured surface
    let app = match api::build_app(config.clone()).await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize {} surface: {}", config.surface, e);
            return;
        }
    };

    // Initialize webserver
    let address = format!("{}:{}", config.server.address, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", address, e);
            return;
        }
    };

    info!("Serving {} surface on http://{}", config.surface, address);
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    info!("Server shutdown complete");
}
