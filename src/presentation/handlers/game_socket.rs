// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::dto::{MessageDto, MessageType};
use crate::application::state::AppState;
use crate::domain::models::player::ConnectionId;
use crate::presentation::handlers::message_handler::handle_message;

/// `/game` WebSocket 入口
pub async fn game_socket(
    ws: WebSocketUpgrade,
    Extension(state): Extension<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// 单个连接的完整生命周期
///
/// 读循环在当前任务中处理客户端消息；写任务把连接中心投递的消息写回套接字，
/// 保证同一连接上的消息按投递顺序发送。
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    let mut outbound = state.hub.register(connection_id);
    let player_id = state.players.add_player(connection_id).id;
    info!(
        "Client connected: connection={}, player={}",
        connection_id, player_id
    );

    let (mut sink, mut stream) = socket.split();

    state.hub.send_to_connection(
        connection_id,
        MessageDto::new(MessageType::ConnectionSuccessful)
            .with_player(player_id.as_str())
            .with_message(json!({ "playerId": player_id })),
    );

    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize {:?}: {}", message.message_type, e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                for reply in dispatch(&state, &player_id, text.as_str()) {
                    state.hub.send_to_connection(connection_id, reply);
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    disconnect(&state, connection_id, &player_id);
    if let Err(e) = writer.await {
        debug!("Writer task for {} ended abnormally: {}", connection_id, e);
    }
}

/// 解析并处理一帧文本，返回要写回发送者的消息
pub(crate) fn dispatch(state: &AppState, player_id: &str, text: &str) -> Vec<MessageDto> {
    let message: MessageDto = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Invalid message from {}: {}", player_id, e);
            return vec![MessageDto::error("Invalid message format")];
        }
    };
    match handle_message(state, player_id, message) {
        Ok(replies) => replies,
        Err(e) => {
            error!("Error handling message from {}: {}", player_id, e);
            vec![MessageDto::error(e.to_string())]
        }
    }
}

/// 连接关闭：离开大厅、移除玩家、通知其余连接
pub(crate) fn disconnect(state: &AppState, connection_id: ConnectionId, player_id: &str) {
    if let Some(lobby_id) = state.lobbies.lobby_of_player(player_id) {
        match state.lobbies.leave_lobby(&lobby_id, player_id) {
            Ok(true) => {
                if let (Ok(players), Ok(members)) = (
                    state.lobby_players(&lobby_id),
                    state.lobby_members(&lobby_id),
                ) {
                    let update = MessageDto::new(MessageType::LobbyUpdated)
                        .with_player(player_id)
                        .with_lobby(lobby_id.as_str())
                        .with_players(players)
                        .with_message(json!({ "left": player_id }));
                    state.hub.notify_lobby(&members, None, &update);
                }
            }
            Ok(false) => {
                state.games.remove_board(&lobby_id);
                state.trading.remove_trades_for_lobby(&lobby_id);
            }
            Err(e) => warn!("Failed to remove {} from lobby {}: {}", player_id, lobby_id, e),
        }
    }

    state.players.remove_player(player_id);
    state.hub.unregister(connection_id);
    state.hub.broadcast(
        &MessageDto::new(MessageType::ClientDisconnected)
            .with_message(json!({ "playerId": player_id })),
        None,
    );
    info!(
        "Client disconnected: connection={}, player={}",
        connection_id, player_id
    );
}
