// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::{LobbyInfo, PlayerInfo};
use crate::domain::models::rules::GameRules;
use crate::domain::services::game_service::GameService;
use crate::domain::services::lobby_service::LobbyService;
use crate::domain::services::player_service::PlayerService;
use crate::domain::services::trading_service::TradingService;
use crate::infrastructure::connection_hub::ConnectionHub;
use crate::utils::errors::GameError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 应用共享状态
///
/// 所有服务以 `Arc` 共享，通过 `Extension` 注入到处理器中。
#[derive(Clone)]
pub struct AppState {
    pub players: Arc<PlayerService>,
    pub lobbies: Arc<LobbyService>,
    pub games: Arc<GameService>,
    pub trading: Arc<TradingService>,
    pub hub: Arc<ConnectionHub>,
    pub rules: GameRules,
}

impl AppState {
    pub fn new(rules: GameRules) -> Self {
        let players = Arc::new(PlayerService::new());
        let lobbies = Arc::new(LobbyService::new(rules.max_players));
        let games = Arc::new(GameService::new(lobbies.clone(), players.clone(), rules));
        let trading = Arc::new(TradingService::new(
            lobbies.clone(),
            players.clone(),
            games.clone(),
        ));
        let hub = Arc::new(ConnectionHub::new(players.clone()));
        Self {
            players,
            lobbies,
            games,
            trading,
            hub,
            rules,
        }
    }

    /// 大厅成员的公开信息，按玩家 id 索引
    pub fn lobby_players(&self, lobby_id: &str) -> Result<BTreeMap<String, PlayerInfo>, GameError> {
        let lobby = self.lobbies.get_lobby(lobby_id)?;
        Ok(lobby
            .players()
            .iter()
            .filter_map(|id| self.players.get_player(id).ok())
            .map(|player| (player.id.clone(), PlayerInfo::from_parts(&player, &lobby)))
            .collect())
    }

    /// 大厅成员 id 列表
    pub fn lobby_members(&self, lobby_id: &str) -> Result<Vec<String>, GameError> {
        self.lobbies
            .with_lobby(lobby_id, |lobby| Ok(lobby.players().to_vec()))
    }

    /// 尚未开始的大厅列表，房主以用户名展示
    pub fn open_lobbies(&self) -> Vec<LobbyInfo> {
        self.lobbies
            .open_lobbies()
            .iter()
            .map(|lobby| {
                let host = self
                    .players
                    .get_player(&lobby.host_player)
                    .map(|p| p.username)
                    .unwrap_or_else(|_| lobby.host_player.clone());
                LobbyInfo::new(lobby, host)
            })
            .collect()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(GameRules::default())
    }
}
