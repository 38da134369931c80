// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::trade::{PlayerTradeRequest, TradeRequest};
use crate::domain::services::game_service::GameService;
use crate::domain::services::lobby_service::LobbyService;
use crate::domain::services::player_service::PlayerService;
use crate::utils::errors::GameError;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 交易服务
///
/// 处理与银行（含港口）的交易，以及玩家之间待确认的交易请求。
/// 玩家交易请求以 `"<lobbyId>#<uuid>"` 为键保存，便于按大厅清理。
pub struct TradingService {
    lobbies: Arc<LobbyService>,
    players: Arc<PlayerService>,
    games: Arc<GameService>,
    trades: DashMap<String, PlayerTradeRequest>,
}

impl TradingService {
    pub fn new(
        lobbies: Arc<LobbyService>,
        players: Arc<PlayerService>,
        games: Arc<GameService>,
    ) -> Self {
        Self {
            lobbies,
            players,
            games,
            trades: DashMap::new(),
        }
    }

    /// 与银行交易：先尝试玩家可用的港口，再退回 4:1
    pub fn trade_with_bank(
        &self,
        lobby_id: &str,
        player_id: &str,
        request: &TradeRequest,
    ) -> Result<(), GameError> {
        self.lobbies.check_player_turn(lobby_id, player_id)?;
        let player = self
            .players
            .get_player(player_id)
            .map_err(|_| GameError::rule("Player not found"))?;
        if !request.is_well_formed() {
            return Err(GameError::InvalidTradeRatio);
        }
        if !player.has_resources(&request.offered_resources) {
            return Err(GameError::rule("Insufficient Resources of Player"));
        }

        let via_port = self
            .games
            .ports_of(lobby_id, player_id)?
            .iter()
            .any(|port| port.can_trade(request));
        if !via_port && !request.is_valid_bank_trade() {
            return Err(GameError::InvalidTradeRatio);
        }

        self.players.with_player_mut(player_id, |player| {
            player.remove_resources(&request.offered_resources)?;
            player.receive_resources(&request.target_resources);
            Ok(())
        })?;
        info!(
            "{} traded {:?} for {:?} with the bank in {}",
            player_id, request.offered_resources, request.target_resources, lobby_id
        );
        Ok(())
    }

    /// 创建玩家交易请求，返回交易 id
    pub fn create_player_trade(
        &self,
        lobby_id: &str,
        request: PlayerTradeRequest,
    ) -> Result<String, GameError> {
        let source = &request.source_player_id;
        let target = &request.target_player_id;
        self.lobbies.with_lobby(lobby_id, |lobby| {
            if source == target || !lobby.contains_player(source) || !lobby.contains_player(target) {
                return Err(GameError::rule("Both players must be in the lobby"));
            }
            if !lobby.is_player_turn(source) && !lobby.is_player_turn(target) {
                return Err(GameError::NotYourTurn);
            }
            Ok(())
        })?;
        if !request.trade.is_well_formed() {
            return Err(GameError::InvalidTradeFormat);
        }
        if !self
            .players
            .has_resources(source, &request.trade.offered_resources)?
        {
            return Err(GameError::InsufficientResources);
        }

        let trade_id = format!("{}#{}", lobby_id, Uuid::new_v4());
        debug!("Trade {} created: {} -> {}", trade_id, source, target);
        self.trades.insert(trade_id.clone(), request);
        Ok(trade_id)
    }

    pub fn get_trade(&self, trade_id: &str) -> Result<PlayerTradeRequest, GameError> {
        self.trades
            .get(trade_id)
            .map(|t| t.clone())
            .ok_or_else(|| GameError::TradeNotFound(trade_id.to_string()))
    }

    /// 目标玩家接受交易；双方资源交换后删除请求
    pub fn accept_player_trade(
        &self,
        trade_id: &str,
        accepting_player_id: &str,
    ) -> Result<PlayerTradeRequest, GameError> {
        let request = self.get_trade(trade_id)?;
        if request.target_player_id != accepting_player_id {
            return Err(GameError::rule("Only the target player can accept this trade"));
        }
        // 先取走请求，防止同一交易被并发接受两次
        let Some((_, request)) = self.trades.remove(trade_id) else {
            return Err(GameError::TradeNotFound(trade_id.to_string()));
        };
        let offered = &request.trade.offered_resources;
        let wanted = &request.trade.target_resources;

        // 两笔扣除都成功后才入账；任一失败则回滚并放回请求
        if let Err(e) = self.players.remove_resources(&request.source_player_id, offered) {
            self.trades.insert(trade_id.to_string(), request);
            return Err(into_trade_error(e));
        }
        if let Err(e) = self.players.remove_resources(&request.target_player_id, wanted) {
            let refund = self.players.with_player_mut(&request.source_player_id, |source| {
                source.receive_resources(offered);
                Ok(())
            });
            if let Err(refund_error) = refund {
                warn!("Trade {} refund failed: {}", trade_id, refund_error);
            }
            self.trades.insert(trade_id.to_string(), request);
            return Err(into_trade_error(e));
        }

        let credited_source = self.players.with_player_mut(&request.source_player_id, |source| {
            source.receive_resources(wanted);
            Ok(())
        });
        let credited_target = self.players.with_player_mut(&request.target_player_id, |target| {
            target.receive_resources(offered);
            Ok(())
        });
        credited_source.and(credited_target)?;
        info!(
            "Trade {} accepted by {}",
            trade_id, request.target_player_id
        );
        Ok(request)
    }

    pub fn reject_player_trade(
        &self,
        trade_id: &str,
        rejecting_player_id: &str,
    ) -> Result<PlayerTradeRequest, GameError> {
        let request = self.get_trade(trade_id)?;
        if request.target_player_id != rejecting_player_id {
            return Err(GameError::rule("Only the target player can reject this trade"));
        }
        self.trades.remove(trade_id);
        debug!("Trade {} rejected by {}", trade_id, rejecting_player_id);
        Ok(request)
    }

    /// 删除某个大厅的全部交易请求，返回删除数量
    pub fn remove_trades_for_lobby(&self, lobby_id: &str) -> usize {
        let prefix = format!("{}#", lobby_id);
        let before = self.trades.len();
        self.trades.retain(|trade_id, _| !trade_id.starts_with(&prefix));
        before.saturating_sub(self.trades.len())
    }

    pub fn pending_trades(&self) -> usize {
        self.trades.len()
    }
}

/// 从 `"<lobbyId>#<uuid>"` 形式的交易 id 中取出大厅 id
pub fn lobby_of_trade(trade_id: &str) -> Option<&str> {
    trade_id
        .split_once('#')
        .map(|(lobby_id, _)| lobby_id)
        .filter(|lobby_id| !lobby_id.trim().is_empty())
}

fn into_trade_error(error: GameError) -> GameError {
    match error {
        GameError::PlayerNotFound(_) => error,
        _ => GameError::InsufficientResources,
    }
}

#[cfg(test)]
#[path = "trading_service_test.rs"]
mod tests;
