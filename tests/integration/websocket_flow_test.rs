// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{create_ws_test_app, Client};
use axum_test::TestServer;
use serde_json::{json, Value};

/// 房主建大厅、客人加入，返回大厅 id
async fn lobby_of_two(server: &TestServer) -> (Client, Client, String) {
    let mut host = Client::connect(server).await;
    let mut guest = Client::connect(server).await;

    host.send("CREATE_LOBBY", None, json!({})).await;
    let created = host.receive().await;
    assert_eq!(created["type"], "LOBBY_CREATED");
    assert!(created["message"]["color"].is_string());
    let lobby_id = created["lobbyId"].as_str().unwrap().to_string();

    guest.send("JOIN_LOBBY", Some(&lobby_id), json!({})).await;
    let joined = guest.receive().await;
    assert_eq!(joined["type"], "PLAYER_JOINED");
    let notified = host.receive().await;
    assert_eq!(notified["type"], "PLAYER_JOINED");
    assert_eq!(notified["players"].as_object().unwrap().len(), 2);

    (host, guest, lobby_id)
}

/// 双方准备后由房主开局，返回（行动玩家，等待玩家）
async fn started_game(host: Client, guest: Client, lobby_id: &str) -> (Client, Client) {
    let (mut host, mut guest) = (host, guest);
    host.send("SET_READY", Some(lobby_id), json!({})).await;
    host.receive_type("LOBBY_UPDATED").await;
    guest.send("SET_READY", Some(lobby_id), json!({})).await;
    // 先是房主准备的通知，再是自己的回复
    guest.receive_type("LOBBY_UPDATED").await;
    let own = guest.receive_type("LOBBY_UPDATED").await;
    assert_eq!(own["message"]["ready"], true);

    host.send("START_GAME", Some(lobby_id), json!({})).await;
    let started = host.receive_type("GAME_STARTED").await;
    assert!(started["message"]["gameboard"].is_object());
    guest.receive_type("GAME_STARTED").await;

    let host_active = started["players"][&host.player_id]["isActivePlayer"] == true;
    if host_active {
        (host, guest)
    } else {
        (guest, host)
    }
}

#[tokio::test]
async fn connection_receives_player_id_and_rejects_bad_frames() {
    let app = create_ws_test_app();
    let mut client = Client::connect(&app.server).await;
    assert!(app.state.players.contains(&client.player_id));

    client.ws.send_text("{not json").await;
    let error = client.receive().await;
    assert_eq!(error["type"], "ERROR");
    assert_eq!(error["message"]["error"], "Invalid message format");

    client.send("GAME_WON", None, json!({})).await;
    let error = client.receive().await;
    assert_eq!(error["message"]["error"], "Invalid client command");
}

#[tokio::test]
async fn lobby_listing_over_websocket() {
    let app = create_ws_test_app();
    let (mut host, _guest, lobby_id) = lobby_of_two(&app.server).await;

    host.send("SET_USERNAME", Some(&lobby_id), json!({"username": "Alice"}))
        .await;
    let updated = host.receive().await;
    assert_eq!(updated["players"][&host.player_id]["username"], "Alice");

    host.send("GET_LOBBIES", None, json!({})).await;
    let list = host.receive().await;
    assert_eq!(list["type"], "LOBBY_LIST");
    assert_eq!(list["message"]["lobbies"][0]["id"], lobby_id.as_str());
    assert_eq!(list["message"]["lobbies"][0]["hostPlayer"], "Alice");
    assert_eq!(list["message"]["lobbies"][0]["playerCount"], 2);
}

#[tokio::test]
async fn setup_round_rules_are_enforced() {
    let app = create_ws_test_app();
    let (host, guest, lobby_id) = lobby_of_two(&app.server).await;
    let (mut active, mut waiting) = started_game(host, guest, &lobby_id).await;

    waiting.send("PLACE_ROAD", Some(&lobby_id), json!({"roadId": 0})).await;
    let error = waiting.receive().await;
    assert_eq!(error["message"]["error"], "It is not your turn!");

    active.send("ROLL_DICE", Some(&lobby_id), json!({})).await;
    let error = active.receive().await;
    assert_eq!(
        error["message"]["error"],
        "Dice cannot be rolled during the setup rounds"
    );

    active.send("END_TURN", Some(&lobby_id), json!({})).await;
    let error = active.receive().await;
    assert_eq!(
        error["message"]["error"],
        "Please place at least one road and one settlement before ending your turn!"
    );

    active
        .send("PLACE_SETTLEMENT", Some(&lobby_id), json!({"settlementPositionId": "x"}))
        .await;
    let error = active.receive().await;
    assert_eq!(
        error["message"]["error"],
        r#"Invalid settlement position id: id = "x""#
    );
}

#[tokio::test]
async fn player_trade_is_offered_and_accepted() {
    let app = create_ws_test_app();
    let (host, guest, lobby_id) = lobby_of_two(&app.server).await;
    let (mut active, mut waiting) = started_game(host, guest, &lobby_id).await;
    app.state
        .players
        .set_username(&waiting.player_id, "Bob")
        .unwrap();

    active
        .send(
            "CREATE_PLAYER_TRADE_REQUEST",
            Some(&lobby_id),
            json!({
                "targetPlayerId": waiting.player_id,
                "trade": {
                    "offeredResources": {"WOOD": 1},
                    "targetResources": {"SHEEP": 1}
                }
            }),
        )
        .await;
    let alert = active.receive().await;
    assert_eq!(alert["type"], "ALERT");
    assert_eq!(alert["message"]["message"], "Sent trade request to Bob");
    assert_eq!(alert["message"]["severity"], "success");

    let offer = waiting.receive().await;
    assert_eq!(offer["type"], "TRADE_OFFER");
    assert_eq!(
        offer["message"]["tradeRequest"]["sourcePlayerId"],
        active.player_id.as_str()
    );
    let trade_id = offer["message"]["tradeId"].as_str().unwrap().to_string();

    waiting
        .send("ACCEPT_TRADE_REQUEST", Some(&lobby_id), json!({"tradeId": trade_id}))
        .await;
    let update = waiting.receive().await;
    assert_eq!(update["type"], "PLAYER_RESOURCE_UPDATE");
    assert_eq!(update["players"][&waiting.player_id]["resources"]["WOOD"], 5);
    assert_eq!(update["players"][&waiting.player_id]["resources"]["SHEEP"], 1);

    let accepted = active.receive().await;
    assert_eq!(accepted["type"], "ALERT");
    assert_eq!(accepted["message"]["message"], "Trade request was accepted by Bob");
    let update = active.receive().await;
    assert_eq!(update["type"], "PLAYER_RESOURCE_UPDATE");
    assert_eq!(app.state.trading.pending_trades(), 0);
}

#[tokio::test]
async fn disconnect_updates_lobby_and_notifies_others() {
    let app = create_ws_test_app();
    let (mut host, guest, lobby_id) = lobby_of_two(&app.server).await;
    let guest_id = guest.player_id.clone();

    guest.ws.close().await;

    let update = host.receive().await;
    assert_eq!(update["type"], "LOBBY_UPDATED");
    assert!(update["players"].get(&guest_id).is_none());
    let goodbye: Value = host.receive().await;
    assert_eq!(goodbye["type"], "CLIENT_DISCONNECTED");
    assert_eq!(goodbye["message"]["playerId"], guest_id.as_str());

    assert!(!app.state.players.contains(&guest_id));
    assert_eq!(
        app.state.lobby_members(&lobby_id).unwrap(),
        vec![host.player_id.clone()]
    );
}
