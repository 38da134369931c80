// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::player::{ConnectionId, Player};
use crate::domain::models::resource::{ResourceMap, TileType};
use crate::utils::errors::GameError;
use dashmap::DashMap;
use tracing::{debug, info};

/// 玩家服务
///
/// 按玩家 id 与连接 id 双向索引在线玩家。
#[derive(Debug, Default)]
pub struct PlayerService {
    players: DashMap<String, Player>,
    connections: DashMap<ConnectionId, String>,
}

impl PlayerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为新连接创建玩家
    pub fn add_player(&self, connection_id: ConnectionId) -> Player {
        let player = Player::new(Some(connection_id));
        self.connections.insert(connection_id, player.id.clone());
        self.players.insert(player.id.clone(), player.clone());
        info!("Player {} created for connection {}", player.id, connection_id);
        player
    }

    /// 注册一个已构造的玩家
    pub fn insert_player(&self, player: Player) {
        if let Some(connection_id) = player.connection_id {
            self.connections.insert(connection_id, player.id.clone());
        }
        self.players.insert(player.id.clone(), player);
    }

    pub fn remove_player_by_connection(&self, connection_id: ConnectionId) -> Option<Player> {
        let (_, player_id) = self.connections.remove(&connection_id)?;
        self.players.remove(&player_id).map(|(_, player)| player)
    }

    pub fn remove_player(&self, player_id: &str) -> Option<Player> {
        let (_, player) = self.players.remove(player_id)?;
        if let Some(connection_id) = player.connection_id {
            self.connections.remove(&connection_id);
        }
        Some(player)
    }

    pub fn get_player(&self, player_id: &str) -> Result<Player, GameError> {
        self.players
            .get(player_id)
            .map(|p| p.clone())
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn get_player_by_connection(&self, connection_id: ConnectionId) -> Option<Player> {
        let player_id = self.connections.get(&connection_id)?.clone();
        self.players.get(&player_id).map(|p| p.clone())
    }

    pub fn player_id_by_connection(&self, connection_id: ConnectionId) -> Option<String> {
        self.connections.get(&connection_id).map(|id| id.clone())
    }

    pub fn connection_of(&self, player_id: &str) -> Option<ConnectionId> {
        self.players.get(player_id).and_then(|p| p.connection_id)
    }

    pub fn all_players(&self) -> Vec<Player> {
        self.players.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.players.len()
    }

    /// 在持有写锁的情况下修改玩家
    pub fn with_player_mut<R>(
        &self,
        player_id: &str,
        f: impl FnOnce(&mut Player) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        let mut player = self
            .players
            .get_mut(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))?;
        f(&mut player)
    }

    pub fn set_username(&self, player_id: &str, username: &str) -> Result<(), GameError> {
        self.with_player_mut(player_id, |player| {
            debug!("Player {} renamed to {}", player.id, username);
            player.username = username.to_string();
            Ok(())
        })
    }

    pub fn receive_resource(
        &self,
        player_id: &str,
        resource: TileType,
        amount: u32,
    ) -> Result<(), GameError> {
        self.with_player_mut(player_id, |player| {
            player.receive_resource(resource, amount);
            Ok(())
        })
    }

    pub fn remove_resources(&self, player_id: &str, resources: &ResourceMap) -> Result<(), GameError> {
        self.with_player_mut(player_id, |player| player.remove_resources(resources))
    }

    pub fn has_resources(&self, player_id: &str, resources: &ResourceMap) -> Result<bool, GameError> {
        self.players
            .get(player_id)
            .map(|p| p.has_resources(resources))
            .ok_or_else(|| GameError::PlayerNotFound(player_id.to_string()))
    }

    pub fn set_victory_points(&self, player_id: &str, points: u32) -> Result<(), GameError> {
        self.with_player_mut(player_id, |player| {
            player.victory_points = points;
            Ok(())
        })
    }

    pub fn check_for_win(&self, player_id: &str, threshold: u32) -> bool {
        self.players
            .get(player_id)
            .map(|p| p.victory_points >= threshold)
            .unwrap_or(false)
    }

    /// 移除连接已断开的玩家，返回移除数量
    pub fn remove_disconnected(&self, is_open: impl Fn(ConnectionId) -> bool) -> usize {
        let stale: Vec<String> = self
            .players
            .iter()
            .filter(|entry| entry.connection_id.map(|c| !is_open(c)).unwrap_or(true))
            .map(|entry| entry.key().clone())
            .collect();
        for player_id in &stale {
            self.remove_player(player_id);
        }
        stale.len()
    }
}
