use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::error::{ServerError, format_validation_errors};

pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

static RELEASE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static IMAGE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^img/[A-Za-z0-9_-]+\.(png|jpg|jpeg)$").unwrap());

/// Validate release date: `YYYY-MM-DD` and a real calendar day. Empty input is left to the length check.
pub fn validate_release_date(date: &str) -> Result<(), ValidationError> {
    if date.is_empty() {
        return Ok(());
    }

    let parsed = NaiveDate::parse_from_str(date, RELEASE_DATE_FORMAT);
    if !RELEASE_DATE.is_match(date) || parsed.is_err() {
        return Err(ValidationError::new("release_date_invalid")
            .with_message("Invalid date format, use YYYY-MM-DD".into()));
    }

    Ok(())
}

/// Validate image path: `img/<name>.(png|jpg|jpeg)` where name is letters, digits, `_` or `-`
pub fn validate_image_path(image: &str) -> Result<(), ValidationError> {
    if image.is_empty() {
        return Ok(());
    }

    if !IMAGE_PATH.is_match(image) {
        return Err(ValidationError::new("image_path_invalid")
            .with_message("Image must have the format img/name.png|jpg|jpeg".into()));
    }

    Ok(())
}

/// One catalog entry. Column and json names follow the `games` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Game {
    pub id: i32,
    #[serde(rename = "titulo")]
    #[sqlx(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    #[sqlx(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    #[sqlx(rename = "categoria")]
    pub category: String,
    #[serde(rename = "fecha")]
    #[sqlx(rename = "fecha")]
    pub release_date: NaiveDate,
    #[serde(rename = "estado")]
    #[sqlx(rename = "estado")]
    pub state: String,
    #[serde(rename = "imagen")]
    #[sqlx(rename = "imagen")]
    pub image: String,
}

/// Validated fields for an insert or a full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub title: String,
    pub description: String,
    pub category: String,
    pub release_date: NaiveDate,
    pub state: String,
    pub image: String,
}

impl NewGame {
    pub fn into_game(self, id: i32) -> Game {
        Game {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            release_date: self.release_date,
            state: self.state,
            image: self.image,
        }
    }
}

/// Create and update payload of the json api.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
pub struct GameInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    pub titulo: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    pub descripcion: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    pub categoria: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "All fields are required"),
        custom(function = "validate_release_date")
    )]
    pub fecha: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    pub estado: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "All fields are required"),
        custom(function = "validate_image_path")
    )]
    pub imagen: String,
}

impl GameInput {
    /// Runs every field check and parses the release date. Nothing here touches storage.
    pub fn into_new_game(self) -> Result<NewGame, ServerError> {
        if let Err(e) = self.validate() {
            return Err(ServerError::Validation(format_validation_errors(&e)));
        }

        let release_date = NaiveDate::parse_from_str(&self.fecha, RELEASE_DATE_FORMAT)
            .map_err(|_| ServerError::Validation("Invalid date format, use YYYY-MM-DD".into()))?;

        Ok(NewGame {
            title: self.titulo,
            description: self.descripcion,
            category: self.categoria,
            release_date,
            state: self.estado,
            image: self.imagen,
        })
    }
}

/// Form posted by the html page. The form has no image input.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GameForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub release_date: String,
}

impl GameForm {
    pub fn with_image(self, image: &str) -> GameInput {
        GameInput {
            titulo: self.title,
            descripcion: self.description,
            categoria: self.category,
            fecha: self.release_date,
            estado: self.state,
            imagen: image.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StateQuery {
    #[serde(default)]
    pub state: String,
}

impl StateQuery {
    pub fn into_state(self) -> Result<String, ServerError> {
        if self.state.is_empty() {
            return Err(ServerError::Validation(
                "Query parameter state is required".into(),
            ));
        }
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: &str = "All fields are required";

    fn valid_input() -> GameInput {
        GameInput {
            titulo: "BT6".into(),
            descripcion: "Juego de disparos en primera persona.".into(),
            categoria: "Accion".into(),
            fecha: "2025-08-20".into(),
            estado: "none".into(),
            imagen: "img/btf6.png".into(),
        }
    }

    fn validation_message(input: GameInput) -> String {
        match input.into_new_game() {
            Err(ServerError::Validation(msg)) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_input_becomes_new_game() {
        let game = valid_input().into_new_game().unwrap();
        assert_eq!(game.title, "BT6");
        assert_eq!(
            game.release_date,
            NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
        );
        assert_eq!(game.image, "img/btf6.png");
    }

    #[test]
    fn every_field_is_required() {
        let blanks: [fn(&mut GameInput); 6] = [
            |i| i.titulo.clear(),
            |i| i.descripcion.clear(),
            |i| i.categoria.clear(),
            |i| i.fecha.clear(),
            |i| i.estado.clear(),
            |i| i.imagen.clear(),
        ];

        for blank in blanks {
            let mut input = valid_input();
            blank(&mut input);
            assert_eq!(validation_message(input), REQUIRED);
        }
    }

    #[test]
    fn us_style_date_is_rejected() {
        let input = GameInput {
            fecha: "08/20/2025".into(),
            ..valid_input()
        };
        assert!(validation_message(input).contains("YYYY-MM-DD"));
    }

    #[test]
    fn image_outside_img_dir_is_rejected() {
        for image in ["foo.png", "img/foo.gif", "img/../x.png"] {
            let input = GameInput {
                imagen: image.into(),
                ..valid_input()
            };
            assert!(validation_message(input).contains("img/"), "{}", image);
        }
    }

    #[test]
    fn form_uses_given_image() {
        let form = GameForm {
            title: "Hades".into(),
            description: "Roguelike".into(),
            category: "Accion".into(),
            state: "owned".into(),
            release_date: "2020-09-17".into(),
        };

        let game = form.with_image("img/default.jpg").into_new_game().unwrap();
        assert_eq!(game.image, "img/default.jpg");
        assert_eq!(game.state, "owned");
    }

    #[test]
    fn empty_state_query_is_rejected() {
        assert!(StateQuery::default().into_state().is_err());
        let query = StateQuery {
            state: "deseado".into(),
        };
        assert_eq!(query.into_state().unwrap(), "deseado");
    }

    #[test]
    fn blank_state_is_kept_like_other_fields() {
        let query = StateQuery { state: " ".into() };
        assert_eq!(query.into_state().unwrap(), " ");

        let input = GameInput {
            titulo: " ".into(),
            ..valid_input()
        };
        assert_eq!(input.into_new_game().unwrap().title, " ");
    }

    #[test]
    fn accepts_image_paths_in_img_dir() {
        for image in ["img/foo.png", "img/btf6.png", "img/cover_art-2.jpeg", "img/x.jpg"] {
            assert!(validate_image_path(image).is_ok(), "{}", image);
        }
    }

    #[test]
    fn rejects_malformed_image_paths() {
        for image in [
            "foo.png",
            "img/foo.gif",
            "img/../x.png",
            "/img/foo.png",
            "img/foo.png.exe",
            "img/sub/foo.png",
            "img/.png",
        ] {
            assert!(validate_image_path(image).is_err(), "{}", image);
        }
    }

    #[test]
    fn accepts_iso_dates_only() {
        assert!(validate_release_date("2025-08-20").is_ok());
        assert!(validate_release_date("08/20/2025").is_err());
        assert!(validate_release_date("2025-8-20").is_err());
        assert!(validate_release_date("2025-02-30").is_err());
        assert!(validate_release_date("2025-08-20T00:00:00Z").is_err());
    }

    #[test]
    fn game_serializes_with_column_names() {
        let game = valid_input().into_new_game().unwrap().into_game(7);
        let json = serde_json::to_value(&game).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["titulo"], "BT6");
        assert_eq!(json["fecha"], "2025-08-20");
        assert_eq!(json["imagen"], "img/btf6.png");
    }
}
