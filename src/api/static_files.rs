use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
};
use tracing::debug;

use crate::{api::method_not_allowed, models::error::ServerError};

/// Directory holding `index.html`, `styles.css` and `app.js`.
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self { root: root.into() })
    }

    async fn read(&self, file: &str) -> Result<Vec<u8>, ServerError> {
        let path = self.root.join(file);
        debug!("Reading {}", path.display());
        Ok(tokio::fs::read(path).await?)
    }
}

pub fn static_routes(assets: Arc<StaticAssets>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(assets)
}

async fn index(State(assets): State<Arc<StaticAssets>>) -> Result<impl IntoResponse, ServerError> {
    let data = assets.read("index.html").await?;
    Ok(([(CONTENT_TYPE, "text/html; charset=utf-8")], data))
}

async fn styles(State(assets): State<Arc<StaticAssets>>) -> Result<impl IntoResponse, ServerError> {
    let data = assets.read("styles.css").await?;
    Ok(([(CONTENT_TYPE, "text/css")], data))
}

async fn script(State(assets): State<Arc<StaticAssets>>) -> Result<impl IntoResponse, ServerError> {
    let data = assets.read("app.js").await?;
    Ok((
        [(CONTENT_TYPE, "application/javascript; charset=utf-8")],
        data,
    ))
}
