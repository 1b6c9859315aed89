use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{
    config::app_config::{AppConfig, Surface},
    models::{app_state::AppState, error::ServerError},
};

pub mod cors_mw;
pub mod game;
pub mod health;
pub mod page;
pub mod static_files;
pub mod validation;

/// Builds the router for the configured surface. Only the database backed
/// surfaces open a pool.
pub async fn build_app(config: Arc<AppConfig>) -> Result<Router, ServerError> {
    let app = match config.surface {
        Surface::Static => static_app(&config),
        Surface::Html | Surface::Api => database_app(AppState::connect(config.clone()).await?),
    };

    Ok(app.layer(TraceLayer::new_for_http()))
}

pub fn database_app(state: Arc<AppState>) -> Router {
    let routes = match state.get_config().surface {
        Surface::Html => page::page_routes(state.clone()),
        Surface::Api | Surface::Static => game::game_routes(state.clone()),
    };

    Router::new()
        .merge(routes)
        .nest("/health", health::health_routes(state))
}

pub fn static_app(config: &AppConfig) -> Router {
    let assets = static_files::StaticAssets::new(&config.static_files.root);

    Router::new()
        .merge(static_files::static_routes(assets))
        .nest("/health", health::static_health_routes())
}

pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}
