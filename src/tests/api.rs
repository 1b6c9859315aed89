use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::json;

use crate::{
    config::app_config::Surface,
    tests::memory_store::{MemoryGameStore, empty_request, json_request, send, test_app},
};

fn bt6() -> serde_json::Value {
    json!({
        "titulo": "BT6",
        "descripcion": "Juego de disparos en primera persona.",
        "categoria": "Accion",
        "fecha": "2025-08-20",
        "estado": "none",
        "imagen": "img/btf6.png",
    })
}

#[tokio::test]
async fn game_lifecycle_through_api() {
    let store = MemoryGameStore::new("deseado");
    let app = test_app(Surface::Api, store.clone());

    let created = send(&app, json_request("POST", "/games", bt6())).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let created = created.json();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["titulo"], "BT6");
    assert_eq!(created["fecha"], "2025-08-20");

    let fetched = send(&app, empty_request("GET", &format!("/games/{}", id))).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), created);

    let wanted = send(
        &app,
        empty_request("PUT", &format!("/game_state/{}?state=deseado", id)),
    )
    .await;
    assert_eq!(wanted.status, StatusCode::OK);
    assert_eq!(wanted.json()["estado"], "deseado");
    assert_eq!(wanted.json()["titulo"], "BT6");

    let deleted = send(&app, empty_request("DELETE", &format!("/games/{}", id))).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_empty());

    let gone = send(&app, empty_request("GET", &format!("/games/{}", id))).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let again = send(&app, empty_request("DELETE", &format!("/games/{}", id))).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));

    let responses = [
        send(&app, empty_request("GET", "/games/404")).await,
        send(&app, json_request("PUT", "/games/404", bt6())).await,
        send(&app, empty_request("PUT", "/game_state/404?state=owned")).await,
        send(&app, empty_request("DELETE", "/games/404")).await,
    ];

    for response in responses {
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn full_update_replaces_every_field() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));
    let id = send(&app, json_request("POST", "/games", bt6())).await.json()["id"]
        .as_i64()
        .unwrap();

    let mut body = bt6();
    body["titulo"] = json!("BT5");
    body["imagen"] = json!("img/btf5.png");
    body["fecha"] = json!("2021-11-19");

    let updated = send(&app, json_request("PUT", &format!("/games/{}", id), body)).await;
    assert_eq!(updated.status, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["id"].as_i64(), Some(id));
    assert_eq!(updated["titulo"], "BT5");
    assert_eq!(updated["imagen"], "img/btf5.png");
    assert_eq!(updated["fecha"], "2021-11-19");
}

#[tokio::test]
async fn wanted_games_is_the_filtered_list() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));

    let empty = send(&app, empty_request("GET", "/wanted_games")).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.text(), "[]");

    for estado in ["none", "deseado", "owned", "deseado"] {
        let mut body = bt6();
        body["estado"] = json!(estado);
        send(&app, json_request("POST", "/games", body)).await;
    }

    let all = send(&app, empty_request("GET", "/games")).await.json();
    let wanted = send(&app, empty_request("GET", "/wanted_games")).await.json();

    let expected: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .filter(|game| game["estado"] == "deseado")
        .cloned()
        .collect();
    assert_eq!(wanted.as_array().unwrap(), &expected);
    assert_eq!(expected.len(), 2);
}

#[tokio::test]
async fn invalid_payloads_never_reach_storage() {
    let store = MemoryGameStore::new("deseado");
    let app = test_app(Surface::Api, store.clone());

    let mut bad_image = bt6();
    bad_image["imagen"] = json!("img/../x.png");
    let mut bad_date = bt6();
    bad_date["fecha"] = json!("08/20/2025");
    let mut missing_title = bt6();
    missing_title["titulo"] = json!("");

    for body in [bad_image, bad_date, missing_title] {
        let response = send(&app, json_request("POST", "/games", body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(!response.text().is_empty());
    }

    let not_json = axum::http::Request::builder()
        .method("POST")
        .uri("/games")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{titulo"))
        .unwrap();
    assert_eq!(send(&app, not_json).await.status, StatusCode::BAD_REQUEST);

    let plain_text = axum::http::Request::builder()
        .method("POST")
        .uri("/games")
        .header("content-type", "text/plain")
        .body(axum::body::Body::from(bt6().to_string()))
        .unwrap();
    let rejected = send(&app, plain_text).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.text(), "Expected JSON");

    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn body_without_content_type_is_decoded() {
    let store = MemoryGameStore::new("deseado");
    let app = test_app(Surface::Api, store.clone());

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/games")
        .body(axum::body::Body::from(bt6().to_string()))
        .unwrap();
    let created = send(&app, request).await;

    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["titulo"], "BT6");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));

    for uri in ["/games/abc", "/games/1.5", "/game_state/x?state=owned"] {
        let method = if uri.starts_with("/game_state") { "PUT" } else { "GET" };
        let response = send(&app, empty_request(method, uri)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(response.text(), "Invalid game ID");
    }

    let cases = [
        ("GET", "/games/1/2", "Invalid URL"),
        ("DELETE", "/games/1/2/3", "Invalid URL"),
        ("GET", "/games/", "Invalid game ID"),
        ("PUT", "/game_state/", "Invalid game ID"),
        ("PUT", "/game_state/1/owned", "Invalid URL"),
        ("PUT", "/game_state?state=owned", "Invalid URL"),
    ];
    for (method, uri, message) in cases {
        let response = send(&app, empty_request(method, uri)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(response.text(), message, "{} {}", method, uri);
    }

    let unknown = send(&app, empty_request("GET", "/nope")).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn state_update_requires_a_state() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));
    let id = send(&app, json_request("POST", "/games", bt6())).await.json()["id"]
        .as_i64()
        .unwrap();

    let response = send(&app, empty_request("PUT", &format!("/game_state/{}", id))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let fetched = send(&app, empty_request("GET", &format!("/games/{}", id))).await;
    assert_eq!(fetched.json()["estado"], "none");
}

#[tokio::test]
async fn options_short_circuits_with_cors_headers() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));

    for uri in ["/games", "/games/1", "/game_state/1", "/wanted_games"] {
        let response = send(&app, empty_request("OPTIONS", uri)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", uri);
        assert_eq!(response.headers["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers["access-control-allow-methods"],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(response.headers["access-control-allow-headers"], "Content-Type");
    }

    let listed = send(&app, empty_request("GET", "/games")).await;
    assert_eq!(listed.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn unsupported_methods_are_rejected() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));

    let responses = [
        send(&app, empty_request("PATCH", "/games")).await,
        send(&app, empty_request("POST", "/wanted_games")).await,
        send(&app, empty_request("GET", "/game_state/1")).await,
    ];

    for response in responses {
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.text(), "Method not allowed");
    }
}

#[tokio::test]
async fn storage_failures_are_internal_errors() {
    let app = test_app(Surface::Api, MemoryGameStore::offline());

    let listed = send(&app, empty_request("GET", "/games")).await;
    assert_eq!(listed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(listed.body.is_empty());

    let created = send(&app, json_request("POST", "/games", bt6())).await;
    assert_eq!(created.status, StatusCode::INTERNAL_SERVER_ERROR);

    let health = send(&app, empty_request("GET", "/health/detailed")).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["database"], false);
}

#[tokio::test]
async fn concurrent_creates_get_unique_ids() {
    let store = MemoryGameStore::new("deseado");
    let app = test_app(Surface::Api, store.clone());

    let requests = (0..50).map(|_| send(&app, json_request("POST", "/games", bt6())));
    let responses = join_all(requests).await;

    let mut ids: Vec<i64> = responses
        .iter()
        .map(|response| {
            assert_eq!(response.status, StatusCode::CREATED);
            response.json()["id"].as_i64().unwrap()
        })
        .collect();
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 50);
    assert_eq!(store.len(), 50);
}

#[tokio::test]
async fn health_endpoints_report_status() {
    let app = test_app(Surface::Api, MemoryGameStore::new("deseado"));

    let health = send(&app, empty_request("GET", "/health")).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.text(), "OK");

    let detailed = send(&app, empty_request("GET", "/health/detailed")).await;
    assert_eq!(detailed.json()["database"], true);
    assert_eq!(detailed.json()["platform"], true);
}
