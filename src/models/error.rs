use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::{error, info, warn};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Sqlx failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Api error: {1}")]
    Api(StatusCode, String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Sqlx(e) => {
                error!("Sqlx failed with error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
            ServerError::Migrate(e) => {
                error!("Migration failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, String::new())
            }
            ServerError::Api(sc, msg) => {
                warn!("Api error: {} - {}", sc, msg);
                (sc, msg)
            }
            ServerError::Validation(msg) => {
                info!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            ServerError::NotFound(e) => {
                warn!("Entity not found: {}", e);
                (StatusCode::NOT_FOUND, e)
            }
            ServerError::MethodNotAllowed => {
                warn!("Method not allowed");
                (
                    StatusCode::METHOD_NOT_ALLOWED,
                    String::from("Method not allowed"),
                )
            }
            ServerError::Io(e) => {
                error!("Failed to read file: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    String::from("Failed to load resource"),
                )
            }
        }
        .into_response()
    }
}

/// Format validation errors into a user-friendly message
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let msg = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} validation failed", field));
            if !messages.contains(&msg) {
                messages.push(msg);
            }
        }
    }

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.sort();
        messages.join(", ")
    }
}
