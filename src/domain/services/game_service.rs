// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::board::port::Port;
use crate::domain::board::GameBoard;
use crate::domain::models::building::BuildingType;
use crate::domain::models::development_card::DevelopmentCard;
use crate::domain::models::dice::{DiceResult, DiceRoller};
use crate::domain::models::lobby::{Lobby, ReportOutcome};
use crate::domain::models::player::Player;
use crate::domain::models::player_color::PlayerColor;
use crate::domain::models::resource::{self, ResourceMap, TileType};
use crate::domain::models::rules::GameRules;
use crate::domain::services::lobby_service::LobbyService;
use crate::domain::services::player_service::PlayerService;
use crate::utils::errors::GameError;
use dashmap::DashMap;
use rand::seq::IndexedRandom;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 手牌超过该数量的玩家在掷出 7 时需弃掉一半
pub const DISCARD_THRESHOLD: u32 = 7;

/// 掷骰后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    pub dice: DiceResult,
    /// 需要弃牌的玩家及数量，仅在掷出 7 时非空
    pub discards: HashMap<String, u32>,
}

/// 强盗偷取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robbery {
    pub victim: String,
    pub resource: TileType,
}

/// 游戏服务
///
/// 持有所有大厅的棋盘并执行对局规则。
///
/// 加锁顺序固定为 大厅 → 棋盘 → 玩家：需要多个注册表时，
/// 先在 [`LobbyService::with_lobby_mut`] 内取得大厅，再进入棋盘，最后修改玩家。
pub struct GameService {
    lobbies: Arc<LobbyService>,
    players: Arc<PlayerService>,
    boards: DashMap<String, GameBoard>,
    rules: GameRules,
    dice: DiceRoller,
}

impl GameService {
    pub fn new(lobbies: Arc<LobbyService>, players: Arc<PlayerService>, rules: GameRules) -> Self {
        Self {
            lobbies,
            players,
            boards: DashMap::new(),
            rules,
            dice: DiceRoller,
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// 开始对局，返回新棋盘的 JSON
    pub fn start_game(&self, lobby_id: &str, requester: &str) -> Result<Value, GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            if !lobby.can_start_game(requester) {
                return Err(GameError::StartGameFailed);
            }
            let board = GameBoard::new(lobby.players().len())?;
            for player_id in lobby.players() {
                self.players.with_player_mut(player_id, |player| {
                    player.reset_for_new_game();
                    Ok(())
                })?;
            }
            let json = board.to_json();
            self.boards.insert(lobby_id.to_string(), board);
            lobby.start_game();
            info!(
                "Game started in lobby {} with {} players",
                lobby_id,
                lobby.players().len()
            );
            Ok(json)
        })
    }

    pub fn board_json(&self, lobby_id: &str) -> Result<Value, GameError> {
        self.with_board(lobby_id, |board| Ok(board.to_json()))
    }

    pub fn has_board(&self, lobby_id: &str) -> bool {
        self.boards.contains_key(lobby_id)
    }

    pub fn remove_board(&self, lobby_id: &str) -> bool {
        self.boards.remove(lobby_id).is_some()
    }

    pub fn with_board<R>(
        &self,
        lobby_id: &str,
        f: impl FnOnce(&GameBoard) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        let board = self
            .boards
            .get(lobby_id)
            .ok_or_else(|| GameError::BoardNotFound(lobby_id.to_string()))?;
        f(&board)
    }

    fn with_board_mut<R>(
        &self,
        lobby_id: &str,
        f: impl FnOnce(&mut GameBoard) -> Result<R, GameError>,
    ) -> Result<R, GameError> {
        let mut board = self
            .boards
            .get_mut(lobby_id)
            .ok_or_else(|| GameError::BoardNotFound(lobby_id.to_string()))?;
        f(&mut board)
    }

    pub fn place_settlement(
        &self,
        lobby_id: &str,
        player_id: &str,
        site_id: usize,
    ) -> Result<(), GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            let color = ensure_turn(lobby, player_id)?;
            if lobby.is_setup_round() && lobby.settlements_placed_this_turn() >= 1 {
                return Err(GameError::SetupLimitExceeded);
            }
            let members = lobby.players().to_vec();
            self.with_board_mut(lobby_id, |board| {
                self.build(board, player_id, BuildingType::Settlement, |board| {
                    board.place_settlement(player_id, color, site_id)
                })?;
                board.update_longest_road();
                self.refresh_victory_points(board, &members)
            })?;
            lobby.record_placement(BuildingType::Settlement);
            debug!("{} placed settlement on {} in {}", player_id, site_id, lobby_id);
            Ok(())
        })
    }

    pub fn upgrade_settlement(
        &self,
        lobby_id: &str,
        player_id: &str,
        site_id: usize,
    ) -> Result<(), GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            let color = ensure_turn(lobby, player_id)?;
            if lobby.is_setup_round() {
                return Err(GameError::rule("Cities cannot be built during the setup rounds"));
            }
            let members = lobby.players().to_vec();
            self.with_board_mut(lobby_id, |board| {
                self.build(board, player_id, BuildingType::City, |board| {
                    board.upgrade_settlement(player_id, color, site_id)
                })?;
                self.refresh_victory_points(board, &members)
            })?;
            debug!("{} upgraded {} to a city in {}", player_id, site_id, lobby_id);
            Ok(())
        })
    }

    pub fn place_road(&self, lobby_id: &str, player_id: &str, road_id: usize) -> Result<(), GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            let color = ensure_turn(lobby, player_id)?;
            let setup_round = lobby.is_setup_round();
            if setup_round && lobby.roads_placed_this_turn() >= 1 {
                return Err(GameError::SetupLimitExceeded);
            }
            let members = lobby.players().to_vec();
            self.with_board_mut(lobby_id, |board| {
                self.build(board, player_id, BuildingType::Road, |board| {
                    board.place_road(player_id, color, road_id, setup_round)
                })?;
                if let Some(holder) = board.update_longest_road() {
                    debug!("Longest road in {} held by {}", lobby_id, holder);
                }
                self.refresh_victory_points(board, &members)
            })?;
            lobby.record_placement(BuildingType::Road);
            debug!("{} placed road {} in {}", player_id, road_id, lobby_id);
            Ok(())
        })
    }

    /// 通用建造流程：数量上限、资源检查、落子、扣除资源
    fn build(
        &self,
        board: &mut GameBoard,
        player_id: &str,
        kind: BuildingType,
        place: impl FnOnce(&mut GameBoard) -> Result<(), GameError>,
    ) -> Result<(), GameError> {
        if let Some(limit) = kind.limit() {
            if board.count_buildings(player_id, kind) >= limit {
                return Err(GameError::BuildableLimitReached {
                    building: kind.to_string(),
                    limit,
                });
            }
        }
        let cost = kind.cost();
        if !self.players.has_resources(player_id, cost)? {
            return Err(GameError::InsufficientResources);
        }
        place(board)?;
        self.players.remove_resources(player_id, cost)
    }

    pub fn buy_development_card(
        &self,
        lobby_id: &str,
        player_id: &str,
    ) -> Result<DevelopmentCard, GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            ensure_turn(lobby, player_id)?;
            if lobby.is_setup_round() {
                return Err(GameError::rule(
                    "Development cards cannot be bought during the setup rounds",
                ));
            }
            let members = lobby.players().to_vec();
            self.with_board_mut(lobby_id, |board| {
                let cost = BuildingType::DevelopmentCard.cost();
                if !self.players.has_resources(player_id, cost)? {
                    return Err(GameError::InsufficientResources);
                }
                let card = board
                    .draw_development_card()
                    .ok_or_else(|| GameError::rule("No development cards left"))?;
                self.players.with_player_mut(player_id, |player| {
                    player.remove_resources(cost)?;
                    player.add_development_card(card);
                    Ok(())
                })?;
                self.refresh_victory_points(board, &members)?;
                info!("{} bought a development card in {}", player_id, lobby_id);
                Ok(card)
            })
        })
    }

    pub fn roll_dice(&self, lobby_id: &str, player_id: &str) -> Result<RollOutcome, GameError> {
        self.apply_dice_roll(lobby_id, player_id, self.dice.roll())
    }

    /// 以给定点数执行掷骰流程
    pub(crate) fn apply_dice_roll(
        &self,
        lobby_id: &str,
        player_id: &str,
        dice: DiceResult,
    ) -> Result<RollOutcome, GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            ensure_turn(lobby, player_id)?;
            if lobby.is_setup_round() {
                return Err(GameError::rule("Dice cannot be rolled during the setup rounds"));
            }
            if !lobby.can_roll_dice(player_id) {
                return Err(GameError::DiceAlreadyRolled);
            }

            let mut discards = HashMap::new();
            if dice.activates_robber() {
                for member in lobby.players() {
                    let held = self.players.get_player(member)?.total_resources();
                    if held > DISCARD_THRESHOLD {
                        discards.insert(member.clone(), held / 2);
                    }
                }
                for (member, amount) in &discards {
                    lobby.set_pending_discard(member, *amount);
                }
                lobby.set_robber_pending(true);
            } else {
                let productions =
                    self.with_board(lobby_id, |board| Ok(board.distribute_resources(dice.total)))?;
                for production in productions {
                    if let Err(err) = self.players.receive_resource(
                        &production.owner,
                        production.resource,
                        production.amount,
                    ) {
                        warn!("Skipping production for {}: {}", production.owner, err);
                    }
                }
            }
            lobby.mark_dice_rolled();
            debug!("{} rolled {} in {}", player_id, dice.total, lobby_id);
            Ok(RollOutcome { dice, discards })
        })
    }

    /// 移动强盗并从相邻的随机对手处偷取一张资源
    pub fn place_robber(
        &self,
        lobby_id: &str,
        player_id: &str,
        tile_id: usize,
    ) -> Result<Option<Robbery>, GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            ensure_turn(lobby, player_id)?;
            if !lobby.is_robber_pending() {
                return Err(GameError::rule("Robber can only be moved after rolling a 7"));
            }
            let robbery = self.with_board_mut(lobby_id, |board| {
                board.move_robber(tile_id)?;
                let victims: Vec<String> = board
                    .players_adjacent_to_tile(tile_id)?
                    .into_iter()
                    .filter(|owner| owner != player_id)
                    .filter(|owner| {
                        self.players
                            .get_player(owner)
                            .map(|p| p.total_resources() > 0)
                            .unwrap_or(false)
                    })
                    .collect();
                let Some(victim) = victims.choose(&mut rand::rng()).cloned() else {
                    return Ok(None);
                };
                let stolen =
                    self.players.with_player_mut(&victim, |p| Ok(p.take_random_resource()))?;
                Ok(match stolen {
                    Some(resource) => {
                        self.players.receive_resource(player_id, resource, 1)?;
                        Some(Robbery { victim, resource })
                    }
                    None => None,
                })
            })?;
            lobby.set_robber_pending(false);
            info!("Robber moved to tile {} in {}", tile_id, lobby_id);
            Ok(robbery)
        })
    }

    pub fn discard_resources(
        &self,
        lobby_id: &str,
        player_id: &str,
        resources: &ResourceMap,
    ) -> Result<(), GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            let owed = lobby
                .pending_discard(player_id)
                .ok_or_else(|| GameError::rule("No discard required"))?;
            if resource::total(resources) != Some(owed) {
                return Err(GameError::rule(format!(
                    "You must discard exactly {} resources",
                    owed
                )));
            }
            self.players.remove_resources(player_id, resources)?;
            lobby.clear_pending_discard(player_id);
            debug!("{} discarded {} resources in {}", player_id, owed, lobby_id);
            Ok(())
        })
    }

    pub fn end_turn(&self, lobby_id: &str, player_id: &str) -> Result<(), GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            ensure_turn(lobby, player_id)?;
            if lobby.is_setup_round()
                && (lobby.settlements_placed_this_turn() < 1 || lobby.roads_placed_this_turn() < 1)
            {
                return Err(GameError::MissingRequiredStructures);
            }
            if lobby.is_robber_pending() {
                return Err(GameError::RobberNotPlaced);
            }
            if lobby.has_pending_discards() {
                return Err(GameError::ResourcesNotDiscarded);
            }
            lobby.next_player_turn()?;
            debug!(
                "Turn passed to {:?} in {} (round {})",
                lobby.active_player(),
                lobby_id,
                lobby.rounds_played()
            );
            Ok(())
        })
    }

    pub fn handle_cheat(
        &self,
        lobby_id: &str,
        player_id: &str,
        resource: TileType,
    ) -> Result<(), GameError> {
        if !resource.is_resource() {
            return Err(GameError::rule("Invalid resource type"));
        }
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            if !lobby.contains_player(player_id) {
                return Err(GameError::PlayerNotFound(player_id.to_string()));
            }
            if lobby.cheat_count(player_id) >= self.rules.max_cheats_per_player {
                return Err(GameError::rule("You have already used all your cheats!"));
            }
            self.players.receive_resource(player_id, resource, 1)?;
            lobby.record_cheat(player_id);
            info!("{} cheated a {} in {}", player_id, resource, lobby_id);
            Ok(())
        })
    }

    pub fn handle_report(
        &self,
        lobby_id: &str,
        reporter_id: &str,
        reported_id: &str,
    ) -> Result<ReportOutcome, GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            if reporter_id == reported_id || !lobby.contains_player(reported_id) {
                return Err(GameError::rule("Invalid player to report."));
            }
            if lobby.report_count(reporter_id) >= self.rules.max_reports_per_player {
                return Err(GameError::rule("You have no reports left!"));
            }
            lobby.record_report(reporter_id, reported_id);

            let uncaught = lobby.uncaught_cheats(reported_id);
            let outcome = if uncaught > 0 {
                self.players.with_player_mut(reported_id, |player| {
                    for _ in 0..uncaught {
                        player.take_random_resource();
                    }
                    Ok(())
                })?;
                lobby.mark_cheats_caught(reported_id);
                ReportOutcome::CorrectReportNew
            } else if lobby.cheat_count(reported_id) > 0 {
                ReportOutcome::CorrectReportAlreadyCaught
            } else {
                self.players.with_player_mut(reporter_id, |player| {
                    player.take_random_resource();
                    Ok(())
                })?;
                ReportOutcome::FalseReport
            };
            info!(
                "{} reported {} in {}: {:?}",
                reporter_id, reported_id, lobby_id, outcome
            );
            Ok(outcome)
        })
    }

    pub fn check_for_win(&self, player_id: &str) -> bool {
        self.players.check_for_win(player_id, self.rules.win_threshold)
    }

    /// 大厅成员按胜利点数从高到低排列
    pub fn leaderboard(&self, lobby_id: &str) -> Result<Vec<Player>, GameError> {
        let members = self.lobbies.with_lobby(lobby_id, |lobby| Ok(lobby.players().to_vec()))?;
        let mut players: Vec<Player> = members
            .iter()
            .filter_map(|id| self.players.get_player(id).ok())
            .collect();
        players.sort_by(|a, b| b.victory_points.cmp(&a.victory_points));
        Ok(players)
    }

    /// 对局结束：大厅重置为等待状态并丢弃棋盘
    pub fn finish_game(&self, lobby_id: &str) -> Result<(), GameError> {
        self.lobbies.with_lobby_mut(lobby_id, |lobby| {
            lobby.reset_for_new_game();
            Ok(())
        })?;
        self.remove_board(lobby_id);
        info!("Game in lobby {} finished", lobby_id);
        Ok(())
    }

    pub fn ports_of(&self, lobby_id: &str, player_id: &str) -> Result<Vec<Port>, GameError> {
        self.with_board(lobby_id, |board| {
            Ok(board.ports_of(player_id).into_iter().cloned().collect())
        })
    }

    /// 按棋盘建筑、最长道路与胜利点卡重新计算成员的胜利点数
    fn refresh_victory_points(&self, board: &GameBoard, members: &[String]) -> Result<(), GameError> {
        for member in members {
            let on_board = board.victory_points_of(member);
            self.players.with_player_mut(member, |player| {
                player.victory_points = on_board + player.victory_point_cards();
                Ok(())
            })?;
        }
        Ok(())
    }
}

/// 校验是否轮到该玩家，返回其颜色
fn ensure_turn(lobby: &Lobby, player_id: &str) -> Result<PlayerColor, GameError> {
    if !lobby.is_player_turn(player_id) {
        return Err(GameError::NotYourTurn);
    }
    lobby.color_of(player_id).ok_or_else(|| GameError::ColorNotFound {
        player_id: player_id.to_string(),
        lobby_id: lobby.id().to_string(),
    })
}

#[cfg(test)]
#[path = "game_service_test.rs"]
mod tests;
