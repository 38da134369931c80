// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;

use crate::application::dto::{LobbyInfo, PlayerInfo};
use crate::application::state::AppState;
use crate::presentation::errors::AppError;

/// 大厅详情
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyDetails {
    pub id: String,
    pub host_player: String,
    pub game_started: bool,
    pub players: Vec<PlayerInfo>,
}

/// 列出尚未开始的大厅
pub async fn list_lobbies(Extension(state): Extension<AppState>) -> Json<Vec<LobbyInfo>> {
    Json(state.open_lobbies())
}

/// 查询单个大厅
pub async fn get_lobby(
    Extension(state): Extension<AppState>,
    Path(lobby_id): Path<String>,
) -> Result<Json<LobbyDetails>, AppError> {
    let lobby = state.lobbies.get_lobby(&lobby_id)?;
    let players = state.lobby_players(&lobby_id)?;
    Ok(Json(LobbyDetails {
        id: lobby.id().to_string(),
        host_player: lobby.host_player().to_string(),
        game_started: lobby.is_game_started(),
        players: lobby
            .players()
            .iter()
            .filter_map(|id| players.get(id).cloned())
            .collect(),
    }))
}
