use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use tracing::info;

use crate::{
    api::{
        method_not_allowed,
        validation::{GameId, unmatched_path},
    },
    models::{app_state::AppState, error::ServerError, game::GameForm},
    service::{render, util::extract_header},
};

static HX_REQUEST: &str = "HX-Request";
static PAGE_TITLE: &str = "Lista de Juegos";

pub fn page_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/games", post(create_game))
        .route("/games/{id}", delete(delete_game))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(unmatched)
        .with_state(state)
}

fn is_htmx(headers: &HeaderMap) -> bool {
    extract_header(HX_REQUEST, headers).is_some_and(|value| value == "true")
}

async fn unmatched(uri: Uri) -> ServerError {
    unmatched_path(uri.path(), &["/games"])
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ServerError> {
    let games = state.get_store().list_games().await?;
    info!("Retrieved {} games", games.len());

    Ok(Html(render::index_page(PAGE_TITLE, &games)))
}

async fn create_game(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<GameForm>,
) -> Result<Response, ServerError> {
    let default_image = &state.get_config().html.default_image;
    let new_game = form.with_image(default_image).into_new_game()?;

    let store = state.get_store();
    let game = store.create_game(&new_game).await?;
    info!("Created game {} ({})", game.id, game.title);

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/").into_response());
    }

    let games = store.list_games().await?;
    Ok(Html(render::game_list(&games)).into_response())
}

/// htmx swaps the deleted item out with the empty body.
async fn delete_game(
    State(state): State<Arc<AppState>>,
    GameId(id): GameId,
) -> Result<impl IntoResponse, ServerError> {
    let game = state.get_store().delete_game(id).await?;
    info!("Deleted game {} ({})", game.id, game.title);

    Ok(StatusCode::OK)
}
