use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::models::{
    error::ServerError,
    game::{Game, NewGame},
};

/// Storage contract for the `games` table. A missing row is always
/// `ServerError::NotFound`, any other failure `ServerError::Sqlx`.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn list_games(&self) -> Result<Vec<Game>, ServerError>;
    async fn list_wanted_games(&self) -> Result<Vec<Game>, ServerError>;
    async fn get_game(&self, id: i32) -> Result<Game, ServerError>;
    async fn create_game(&self, game: &NewGame) -> Result<Game, ServerError>;
    async fn update_game(&self, id: i32, game: &NewGame) -> Result<Game, ServerError>;
    async fn update_game_state(&self, id: i32, state: &str) -> Result<Game, ServerError>;
    async fn delete_game(&self, id: i32) -> Result<Game, ServerError>;
    async fn health_check(&self) -> Result<(), ServerError>;
}

pub struct PgGameStore {
    pool: Pool<Postgres>,
    wanted_state: String,
}

impl PgGameStore {
    pub fn new(pool: Pool<Postgres>, wanted_state: impl Into<String>) -> Self {
        Self {
            pool,
            wanted_state: wanted_state.into(),
        }
    }

    pub fn get_pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

fn not_found(id: i32) -> ServerError {
    ServerError::NotFound(format!("Game with id {} does not exist", id))
}

#[async_trait]
impl GameStore for PgGameStore {
    async fn list_games(&self) -> Result<Vec<Game>, ServerError> {
        let games = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, titulo, descripcion, categoria, fecha, estado, imagen
            FROM "games"
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(games)
    }

    async fn list_wanted_games(&self) -> Result<Vec<Game>, ServerError> {
        let games = sqlx::query_as::<_, Game>(
            r#"
            SELECT id, titulo, descripcion, categoria, fecha, estado, imagen
            FROM "games"
            WHERE estado = $1
            ORDER BY id
            "#,
        )
        .bind(&self.wanted_state)
        .fetch_all(&self.pool)
        .await?;

        Ok(games)
    }

    async fn get_game(&self, id: i32) -> Result<Game, ServerError> {
        sqlx::query_as::<_, Game>(
            r#"
            SELECT id, titulo, descripcion, categoria, fecha, estado, imagen
            FROM "games"
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn create_game(&self, game: &NewGame) -> Result<Game, ServerError> {
        let row = sqlx::query_as::<_, Game>(
            r#"
            INSERT INTO "games" (titulo, descripcion, categoria, fecha, estado, imagen)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, titulo, descripcion, categoria, fecha, estado, imagen
            "#,
        )
        .bind(&game.title)
        .bind(&game.description)
        .bind(&game.category)
        .bind(game.release_date)
        .bind(&game.state)
        .bind(&game.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_game(&self, id: i32, game: &NewGame) -> Result<Game, ServerError> {
        sqlx::query_as::<_, Game>(
            r#"
            UPDATE "games"
            SET titulo = $2, descripcion = $3, categoria = $4, fecha = $5, estado = $6, imagen = $7
            WHERE id = $1
            RETURNING id, titulo, descripcion, categoria, fecha, estado, imagen
            "#,
        )
        .bind(id)
        .bind(&game.title)
        .bind(&game.description)
        .bind(&game.category)
        .bind(game.release_date)
        .bind(&game.state)
        .bind(&game.image)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn update_game_state(&self, id: i32, state: &str) -> Result<Game, ServerError> {
        sqlx::query_as::<_, Game>(
            r#"
            UPDATE "games"
            SET estado = $2
            WHERE id = $1
            RETURNING id, titulo, descripcion, categoria, fecha, estado, imagen
            "#,
        )
        .bind(id)
        .bind(state)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn delete_game(&self, id: i32) -> Result<Game, ServerError> {
        sqlx::query_as::<_, Game>(
            r#"
            DELETE FROM "games"
            WHERE id = $1
            RETURNING id, titulo, descripcion, categoria, fecha, estado, imagen
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn health_check(&self) -> Result<(), ServerError> {
        let _ = sqlx::query("SELECT 1 as one").fetch_one(&self.pool).await?;
        Ok(())
    }
}
