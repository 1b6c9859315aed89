use std::fmt::Write;

use ammonia::clean_text;

use crate::models::game::Game;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@2.0.4";

/// Full page: the create form followed by the current list.
pub fn index_page(title: &str, games: &[Game]) -> String {
    let title = clean_text(title);
    let list = game_list(games);

    format!(
        r##"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <script src="{HTMX_SRC}"></script>
    <style>
        body {{ font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
        form {{ display: grid; gap: .5rem; margin-bottom: 2rem; }}
        #games {{ list-style: none; padding: 0; }}
        .game {{ border: 1px solid #ccc; border-radius: 4px; padding: 1rem; margin-bottom: 1rem; }}
        .game img {{ max-width: 160px; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <form method="post" action="/games" hx-post="/games" hx-target="#games" hx-swap="outerHTML"
          hx-on::after-request="if (event.detail.successful) this.reset()">
        <input name="title" placeholder="Titulo" required>
        <textarea name="description" placeholder="Descripcion" required></textarea>
        <input name="category" placeholder="Categoria" required>
        <input name="release_date" type="date" required>
        <select name="state">
            <option value="none">none</option>
            <option value="owned">owned</option>
            <option value="deseado">deseado</option>
        </select>
        <button type="submit">Agregar</button>
    </form>
{list}
</body>
</html>
"##
    )
}

/// List fragment swapped in by htmx after a create.
pub fn game_list(games: &[Game]) -> String {
    let mut html = String::from("    <ul id=\"games\">\n");
    for game in games {
        html.push_str(&game_item(game));
    }
    html.push_str("    </ul>\n");
    html
}

fn game_item(game: &Game) -> String {
    let mut html = String::new();
    let title = clean_text(&game.title);

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"        <li class="game" id="game-{id}">
            <h2>{title}</h2>
            <p>{description}</p>
            <p>Genero: {category}</p>
            <p>Fecha salida: {release_date}</p>
            <p>Estado: {state}</p>
            <img src="{image}" alt="Imagen de {title}">
            <button hx-delete="/games/{id}" hx-target="closest li" hx-swap="outerHTML">X</button>
        </li>
"#,
        id = game.id,
        title = title,
        description = clean_text(&game.description),
        category = clean_text(&game.category),
        release_date = game.release_date.format("%Y-%m-%d"),
        state = clean_text(&game.state),
        image = clean_text(&game.image),
    );

    html
}
