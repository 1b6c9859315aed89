use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path},
    http::{StatusCode, header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use validator::Validate;

use crate::models::error::{ServerError, format_validation_errors};

/// Json body that passed `Validate`. A body without a content type is still
/// decoded, one declaring anything other than json is not.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send + 'static,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = req.headers().get(CONTENT_TYPE) {
            let is_json = content_type
                .to_str()
                .is_ok_and(|ct| ct.starts_with("application/json"));

            if !is_json {
                return Err(ServerError::Api(
                    StatusCode::BAD_REQUEST,
                    "Expected JSON".into(),
                ));
            }
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| ServerError::Api(StatusCode::BAD_REQUEST, "Invalid JSON".into()))?;

        let value: T = match serde_json::from_slice(&body) {
            Ok(val) => val,
            Err(e) => {
                info!("Failed to decode body: {}", e);
                return Err(ServerError::Api(
                    StatusCode::BAD_REQUEST,
                    "Invalid JSON".into(),
                ));
            }
        };

        match value.validate() {
            Ok(_) => {
                debug!("Validation passed");
                Ok(ValidatedJson(value))
            }
            Err(e) => Err(ServerError::Validation(format_validation_errors(&e))),
        }
    }
}

/// Numeric `{id}` path segment. Anything else is a 400 before storage is queried.
#[derive(Debug, Clone, Copy)]
pub struct GameId(pub i32);

impl<S> FromRequestParts<S> for GameId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ServerError::Api(StatusCode::BAD_REQUEST, "Invalid URL".into()))?;

        let id = raw
            .parse::<i32>()
            .map_err(|_| ServerError::Api(StatusCode::BAD_REQUEST, "Invalid game ID".into()))?;

        Ok(Self(id))
    }
}

/// Maps a path no route matched. Under an id taking prefix the path is
/// malformed rather than missing: an empty id is "Invalid game ID", any other
/// segment count is "Invalid URL".
pub fn unmatched_path(path: &str, id_prefixes: &[&str]) -> ServerError {
    for prefix in id_prefixes {
        let Some(rest) = path.strip_prefix(prefix) else {
            continue;
        };

        match rest {
            "/" => {
                return ServerError::Api(StatusCode::BAD_REQUEST, "Invalid game ID".into());
            }
            "" => return ServerError::Api(StatusCode::BAD_REQUEST, "Invalid URL".into()),
            rest if rest.starts_with('/') => {
                return ServerError::Api(StatusCode::BAD_REQUEST, "Invalid URL".into());
            }
            _ => {}
        }
    }

    ServerError::NotFound(format!("No route for {}", path))
}
