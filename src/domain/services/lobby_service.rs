// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lobby::Lobby;
use crate::domain::models::player_color::PlayerColor;
use crate::utils::errors::GameError;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use tracing::{debug, info, warn};

/// 大厅列表中的一项（不含用户名解析）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenLobby {
    pub id: String,
    pub host_player: String,
    pub player_count: usize,
    pub created_at: DateTime<Utc>,
}

/// 大厅服务
///
/// 管理所有大厅的生命周期：创建、加入、离开、查询以及过期清理。
/// 对大厅的修改统一通过 [`LobbyService::with_lobby_mut`] 在分片写锁内完成。
#[derive(Debug)]
pub struct LobbyService {
    lobbies: DashMap<String, Lobby>,
    max_players: usize,
}

impl Default for LobbyService {
    fn default() -> Self {
        Self::new(PlayerColor::assignable().len())
    }
}

impl LobbyService {
    pub fn new(max_players: usize) -> Self {
        Self {
            lobbies: DashMap::new(),
            max_players: max_players.min(PlayerColor::assignable().len()),
        }
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// 创建大厅，房主自动获得一种颜色
    pub fn create_lobby(&self, host_player_id: &str) -> Result<String, GameError> {
        // 一名玩家同一时间只能属于一个大厅
        if let Some(current) = self.lobby_of_player(host_player_id) {
            warn!(
                "Player {} tried to create a lobby while in lobby {}",
                host_player_id, current
            );
            return Err(GameError::JoinLobbyFailed);
        }
        loop {
            let lobby_id = generate_lobby_id();
            // 查重与插入在同一分片锁内完成
            if let Entry::Vacant(slot) = self.lobbies.entry(lobby_id.clone()) {
                let mut lobby = Lobby::new(lobby_id.clone(), host_player_id);
                lobby.assign_available_color(host_player_id);
                slot.insert(lobby);
                info!("Lobby {} created by {}", lobby_id, host_player_id);
                return Ok(lobby_id);
            }
        }
    }

    /// 加入大厅，返回分配到的颜色
    pub fn join_lobby(&self, lobby_id: &str, player_id: &str) -> Result<PlayerColor, GameError> {
        let max_players = self.max_players;
        // 必须在拿到分片写锁之前遍历
        if let Some(current) = self.lobby_of_player(player_id) {
            if current != lobby_id {
                warn!(
                    "Player {} tried to join lobby {} while in lobby {}",
                    player_id, lobby_id, current
                );
                return Err(GameError::JoinLobbyFailed);
            }
        }
        let mut lobby = self
            .lobbies
            .get_mut(lobby_id)
            .ok_or(GameError::JoinLobbyFailed)?;
        if lobby.contains_player(player_id) {
            return lobby.color_of(player_id).ok_or(GameError::JoinLobbyFailed);
        }
        if lobby.is_game_started() || lobby.players().len() >= max_players {
            warn!("Player {} could not join lobby {}", player_id, lobby_id);
            return Err(GameError::JoinLobbyFailed);
        }
        let color = lobby
            .assign_available_color(player_id)
            .ok_or(GameError::JoinLobbyFailed)?;
        lobby.add_player(player_id);
        info!("Player {} joined lobby {} as {:?}", player_id, lobby_id, color);
        Ok(color)
    }

    /// 离开大厅；大厅变空时一并移除。返回大厅是否仍然存在
    pub fn leave_lobby(&self, lobby_id: &str, player_id: &str) -> Result<bool, GameError> {
        let now_empty = self.with_lobby_mut(lobby_id, |lobby| {
            lobby.remove_player(player_id);
            Ok(lobby.is_empty())
        })?;
        if now_empty {
            self.lobbies.remove_if(lobby_id, |_, lobby| lobby.is_empty());
            info!("Lobby {} removed after last player left", lobby_id);
        }
        debug!("Player {} left lobby {}", player_id, lobby_id);
        Ok(!now_empty)
    }

    pub fn get_lobby(&self, lobby_id: &str) -> Result<Lobby, GameError> {
        self.with_lobby(lobby_id, |lobby| Ok(lobby.clone()))
    }

    pub fn contains(&self, lobby_id: &str) -> bool {
        self.lobbies.contains_key(lobby_id)
    }

    pub fn with_lobby<R>(
        &self,
        lobby_id: &str,
        f: impl FnOnce(&Lobby) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        if lobby_id.trim().is_empty() {
            return Err(GameError::EmptyLobbyId);
        }
        let lobby = self
            .lobbies
            .get(lobby_id)
            .ok_or_else(|| GameError::LobbyNotFound(lobby_id.to_string()))?;
        f(&lobby)
    }

    pub fn with_lobby_mut<R>(
        &self,
        lobby_id: &str,
        f: impl FnOnce(&mut Lobby) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        if lobby_id.trim().is_empty() {
            return Err(GameError::EmptyLobbyId);
        }
        let mut lobby = self
            .lobbies
            .get_mut(lobby_id)
            .ok_or_else(|| GameError::LobbyNotFound(lobby_id.to_string()))?;
        f(&mut lobby)
    }

    pub fn player_color(&self, lobby_id: &str, player_id: &str) -> Result<PlayerColor, GameError> {
        self.with_lobby(lobby_id, |lobby| {
            lobby.color_of(player_id).ok_or_else(|| GameError::ColorNotFound {
                player_id: player_id.to_string(),
                lobby_id: lobby_id.to_string(),
            })
        })
    }

    pub fn check_player_turn(&self, lobby_id: &str, player_id: &str) -> Result<(), GameError> {
        self.with_lobby(lobby_id, |lobby| {
            if lobby.is_player_turn(player_id) {
                Ok(())
            } else {
                Err(GameError::NotYourTurn)
            }
        })
    }

    /// 尚未开局的大厅，按创建时间从新到旧
    pub fn open_lobbies(&self) -> Vec<OpenLobby> {
        let mut lobbies: Vec<OpenLobby> = self
            .lobbies
            .iter()
            .filter(|entry| !entry.is_game_started())
            .map(|entry| OpenLobby {
                id: entry.id().to_string(),
                host_player: entry.host_player().to_string(),
                player_count: entry.players().len(),
                created_at: entry.created_at(),
            })
            .collect();
        lobbies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        lobbies
    }

    pub fn lobby_of_player(&self, player_id: &str) -> Option<String> {
        self.lobbies
            .iter()
            .find(|entry| entry.contains_player(player_id))
            .map(|entry| entry.key().clone())
    }

    pub fn remove_lobby(&self, lobby_id: &str) -> Option<Lobby> {
        self.lobbies.remove(lobby_id).map(|(_, lobby)| lobby)
    }

    pub fn lobbies_older_than(&self, cutoff: DateTime<Utc>) -> Vec<String> {
        self.lobbies
            .iter()
            .filter(|entry| entry.created_at() < cutoff)
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.lobbies.len()
    }
}

/// 生成大厅 id：3 个小写字母与 3 个数字，先后顺序随机
pub fn generate_lobby_id() -> String {
    let mut rng = rand::rng();
    let letters: String = (0..3)
        .map(|_| char::from(rng.random_range(b'a'..=b'z')))
        .collect();
    let digits: String = (0..3)
        .map(|_| char::from(rng.random_range(b'0'..=b'9')))
        .collect();
    if rng.random_bool(0.5) {
        letters + &digits
    } else {
        digits + &letters
    }
}

#[cfg(test)]
#[path = "lobby_service_test.rs"]
mod tests;
