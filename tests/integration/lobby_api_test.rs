// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::create_test_app;
use axum::http::StatusCode;
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
async fn lists_open_lobbies_with_host_username() {
    let app = create_test_app();
    let host = app.state.players.add_player(Uuid::new_v4()).id;
    app.state.players.set_username(&host, "Alice").unwrap();
    let lobby_id = app.state.lobbies.create_lobby(&host).unwrap();

    let response = app.server.get("/v1/lobbies").await;
    response.assert_status_ok();
    let lobbies: Value = response.json();
    assert_eq!(lobbies.as_array().unwrap().len(), 1);
    assert_eq!(lobbies[0]["id"], lobby_id.as_str());
    assert_eq!(lobbies[0]["hostPlayer"], "Alice");
    assert_eq!(lobbies[0]["playerCount"], 1);
}

#[tokio::test]
async fn empty_registry_returns_empty_list() {
    let app = create_test_app();
    let response = app.server.get("/v1/lobbies").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), serde_json::json!([]));
}

#[tokio::test]
async fn lobby_details_include_players() {
    let app = create_test_app();
    let host = app.state.players.add_player(Uuid::new_v4()).id;
    let guest = app.state.players.add_player(Uuid::new_v4()).id;
    let lobby_id = app.state.lobbies.create_lobby(&host).unwrap();
    app.state.lobbies.join_lobby(&lobby_id, &guest).unwrap();

    let response = app.server.get(&format!("/v1/lobbies/{}", lobby_id)).await;
    response.assert_status_ok();
    let details: Value = response.json();
    assert_eq!(details["hostPlayer"], host.as_str());
    assert_eq!(details["gameStarted"], false);
    assert_eq!(details["players"][0]["id"], host.as_str());
    assert_eq!(details["players"][1]["id"], guest.as_str());
}

#[tokio::test]
async fn unknown_lobby_returns_not_found() {
    let app = create_test_app();
    let response = app
        .server
        .get("/v1/lobbies/zzz999")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"],
        "Lobby with id zzz999 not found"
    );
}
