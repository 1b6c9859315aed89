use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, put},
};
use tracing::{debug, info};

use crate::{
    api::{
        cors_mw::cors_mw,
        method_not_allowed,
        validation::{GameId, ValidatedJson, unmatched_path},
    },
    models::{
        app_state::AppState,
        error::ServerError,
        game::{GameInput, StateQuery},
    },
};

pub fn game_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route("/game_state/{id}", put(update_game_state))
        .route("/wanted_games", get(list_wanted_games))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(unmatched)
        .layer(from_fn(cors_mw))
        .with_state(state)
}

async fn unmatched(uri: Uri) -> ServerError {
    unmatched_path(uri.path(), &["/games", "/game_state"])
}

async fn list_games(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ServerError> {
    let games = state.get_store().list_games().await?;
    info!("Retrieved {} games", games.len());

    Ok((StatusCode::OK, Json(games)))
}

async fn list_wanted_games(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let games = state.get_store().list_wanted_games().await?;
    info!("Retrieved {} wanted games", games.len());

    Ok((StatusCode::OK, Json(games)))
}

async fn get_game(
    State(state): State<Arc<AppState>>,
    GameId(id): GameId,
) -> Result<impl IntoResponse, ServerError> {
    let game = state.get_store().get_game(id).await?;
    debug!("Retrieved game: {:?}", game);

    Ok((StatusCode::OK, Json(game)))
}

async fn create_game(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<GameInput>,
) -> Result<impl IntoResponse, ServerError> {
    let new_game = input.into_new_game()?;
    let game = state.get_store().create_game(&new_game).await?;
    info!("Created game {} ({})", game.id, game.title);

    Ok((StatusCode::CREATED, Json(game)))
}

async fn update_game(
    State(state): State<Arc<AppState>>,
    GameId(id): GameId,
    ValidatedJson(input): ValidatedJson<GameInput>,
) -> Result<impl IntoResponse, ServerError> {
    let new_game = input.into_new_game()?;
    let game = state.get_store().update_game(id, &new_game).await?;
    info!("Updated game {}", game.id);
    debug!("Updated game: {:?}", game);

    Ok((StatusCode::OK, Json(game)))
}

async fn update_game_state(
    State(state): State<Arc<AppState>>,
    GameId(id): GameId,
    Query(query): Query<StateQuery>,
) -> Result<impl IntoResponse, ServerError> {
    let game_state = query.into_state()?;
    let game = state.get_store().update_game_state(id, &game_state).await?;
    info!("Game {} state changed to {}", game.id, game.state);

    Ok((StatusCode::OK, Json(game)))
}

async fn delete_game(
    State(state): State<Arc<AppState>>,
    GameId(id): GameId,
) -> Result<impl IntoResponse, ServerError> {
    let game = state.get_store().delete_game(id).await?;
    info!("Deleted game {} ({})", game.id, game.title);

    Ok(StatusCode::NO_CONTENT)
}
