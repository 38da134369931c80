// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::building::BuildingType;
use crate::domain::models::player_color::PlayerColor;
use crate::utils::errors::GameError;
use chrono::{DateTime, Utc};
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::{HashMap, HashSet};

/// 举报记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub reporter_id: String,
    pub reported_id: String,
}

/// 举报结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// 被举报者存在未被抓到的作弊
    CorrectReportNew,
    /// 被举报者作弊过，但都已被抓到
    CorrectReportAlreadyCaught,
    /// 被举报者从未作弊
    FalseReport,
}

/// 当前回合内的状态，换人时清空
#[derive(Debug, Clone, Default)]
struct TurnState {
    dice_rolled: bool,
    settlements_placed: u32,
    roads_placed: u32,
}

/// 游戏大厅
///
/// 保存大厅成员、颜色分配、回合顺序以及对局进行中的回合状态。
/// 大厅本身不持有棋盘和玩家资源，这些由对应的服务管理。
#[derive(Debug, Clone)]
pub struct Lobby {
    id: String,
    host_player: String,
    players: Vec<String>,
    player_order: Vec<String>,
    active_player: Option<String>,
    game_started: bool,
    ready_players: HashSet<String>,
    colors: HashMap<String, PlayerColor>,
    available_colors: Vec<PlayerColor>,
    rounds_played: u32,
    turn: TurnState,
    robber_pending: bool,
    pending_discards: HashMap<String, u32>,
    cheat_counts: HashMap<String, u32>,
    caught_cheats: HashMap<String, u32>,
    report_counts: HashMap<String, u32>,
    report_records: Vec<ReportRecord>,
    created_at: DateTime<Utc>,
}

impl Lobby {
    pub fn new(id: impl Into<String>, host_player: impl Into<String>) -> Self {
        let host_player = host_player.into();
        Self {
            id: id.into(),
            players: vec![host_player.clone()],
            host_player,
            player_order: Vec::new(),
            active_player: None,
            game_started: false,
            ready_players: HashSet::new(),
            colors: HashMap::new(),
            available_colors: PlayerColor::assignable().to_vec(),
            rounds_played: 0,
            turn: TurnState::default(),
            robber_pending: false,
            pending_discards: HashMap::new(),
            cheat_counts: HashMap::new(),
            caught_cheats: HashMap::new(),
            report_counts: HashMap::new(),
            report_records: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn host_player(&self) -> &str {
        &self.host_player
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host_player == player_id
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn contains_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p == player_id)
    }

    pub fn player_order(&self) -> &[String] {
        &self.player_order
    }

    pub fn active_player(&self) -> Option<&str> {
        self.active_player.as_deref()
    }

    pub fn is_game_started(&self) -> bool {
        self.game_started
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    pub fn add_player(&mut self, player_id: impl Into<String>) -> bool {
        let player_id = player_id.into();
        if self.contains_player(&player_id) {
            return false;
        }
        self.players.push(player_id);
        true
    }

    /// 移除玩家并归还其颜色
    ///
    /// 若移除的是当前行动玩家，行动权交给顺序中的下一位；
    /// 若移除的是房主，第一个剩余玩家成为新房主。
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        let Some(index) = self.players.iter().position(|p| p == player_id) else {
            return false;
        };
        self.players.remove(index);
        self.ready_players.remove(player_id);
        self.pending_discards.remove(player_id);
        if let Some(color) = self.colors.remove(player_id) {
            self.restore_color(color);
        }

        if let Some(order_index) = self.player_order.iter().position(|p| p == player_id) {
            self.player_order.remove(order_index);
            if self.active_player.as_deref() == Some(player_id) {
                self.active_player = if self.player_order.is_empty() {
                    None
                } else {
                    Some(self.player_order[order_index % self.player_order.len()].clone())
                };
                self.turn = TurnState::default();
                self.robber_pending = false;
            }
        }

        if self.host_player == player_id {
            if let Some(first) = self.players.first() {
                self.host_player = first.clone();
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// 随机分配一个可用颜色，颜色用尽时返回 `None`
    pub fn assign_available_color(&mut self, player_id: &str) -> Option<PlayerColor> {
        if let Some(color) = self.colors.get(player_id) {
            return Some(*color);
        }
        let color = *self.available_colors.choose(&mut rand::rng())?;
        self.available_colors.retain(|c| *c != color);
        self.colors.insert(player_id.to_string(), color);
        Some(color)
    }

    pub fn restore_color(&mut self, color: PlayerColor) {
        if color != PlayerColor::None && !self.available_colors.contains(&color) {
            self.available_colors.push(color);
        }
    }

    pub fn available_colors(&self) -> &[PlayerColor] {
        &self.available_colors
    }

    pub fn color_of(&self, player_id: &str) -> Option<PlayerColor> {
        self.colors.get(player_id).copied()
    }

    /// 切换准备状态，返回切换后的状态
    pub fn toggle_ready(&mut self, player_id: &str) -> bool {
        if self.ready_players.remove(player_id) {
            false
        } else {
            self.ready_players.insert(player_id.to_string());
            true
        }
    }

    pub fn is_ready(&self, player_id: &str) -> bool {
        self.ready_players.contains(player_id)
    }

    pub fn can_start_game(&self, requester: &str) -> bool {
        self.is_host(requester)
            && self.players.len() >= 2
            && !self.game_started
            && self.players.iter().all(|p| self.ready_players.contains(p))
    }

    /// 打乱顺序并开始对局
    pub fn start_game(&mut self) {
        let mut order = self.players.clone();
        order.shuffle(&mut rand::rng());
        self.set_player_order(order);
        self.game_started = true;
    }

    /// 设置回合顺序，第一位成为行动玩家
    pub fn set_player_order(&mut self, order: Vec<String>) {
        self.active_player = order.first().cloned();
        self.player_order = order;
        self.rounds_played = 0;
        self.turn = TurnState::default();
        self.robber_pending = false;
        self.pending_discards.clear();
    }

    pub fn is_player_turn(&self, player_id: &str) -> bool {
        self.active_player.as_deref() == Some(player_id)
    }

    pub fn is_setup_round(&self) -> bool {
        self.rounds_played < 2
    }

    /// 推进到下一位玩家
    ///
    /// 前两轮为蛇形顺序：第 0 轮正序，最后一位连走两次后进入第 1 轮倒序；
    /// 第 1 轮回到第一位后进入常规轮次，由第二位开始。
    pub fn next_player_turn(&mut self) -> Result<(), GameError> {
        let failed = || GameError::rule("Executing next turn failed");
        let n = self.player_order.len();
        if n == 0 {
            return Err(failed());
        }
        let active = self.active_player.as_deref().ok_or_else(failed)?;
        let index = self
            .player_order
            .iter()
            .position(|p| p == active)
            .ok_or_else(failed)?;

        let next_index = match self.rounds_played {
            0 => {
                if index == n - 1 {
                    self.rounds_played = 1;
                    index
                } else {
                    index + 1
                }
            }
            1 => {
                if index == 0 {
                    self.rounds_played = 2;
                    1 % n
                } else {
                    index - 1
                }
            }
            _ => {
                let next = (index + 1) % n;
                if next == 0 {
                    self.rounds_played += 1;
                }
                next
            }
        };

        self.active_player = Some(self.player_order[next_index].clone());
        self.turn = TurnState::default();
        Ok(())
    }

    pub fn can_roll_dice(&self, player_id: &str) -> bool {
        self.game_started
            && self.is_player_turn(player_id)
            && !self.is_setup_round()
            && !self.turn.dice_rolled
            && !self.robber_pending
    }

    pub fn has_rolled_dice(&self) -> bool {
        self.turn.dice_rolled
    }

    pub fn mark_dice_rolled(&mut self) {
        self.turn.dice_rolled = true;
    }

    pub fn record_placement(&mut self, building: BuildingType) {
        match building {
            BuildingType::Settlement => self.turn.settlements_placed += 1,
            BuildingType::Road => self.turn.roads_placed += 1,
            _ => {}
        }
    }

    pub fn settlements_placed_this_turn(&self) -> u32 {
        self.turn.settlements_placed
    }

    pub fn roads_placed_this_turn(&self) -> u32 {
        self.turn.roads_placed
    }

    pub fn is_robber_pending(&self) -> bool {
        self.robber_pending
    }

    pub fn set_robber_pending(&mut self, pending: bool) {
        self.robber_pending = pending;
    }

    pub fn set_pending_discard(&mut self, player_id: &str, amount: u32) {
        self.pending_discards.insert(player_id.to_string(), amount);
    }

    pub fn pending_discard(&self, player_id: &str) -> Option<u32> {
        self.pending_discards.get(player_id).copied()
    }

    pub fn pending_discards(&self) -> &HashMap<String, u32> {
        &self.pending_discards
    }

    pub fn clear_pending_discard(&mut self, player_id: &str) {
        self.pending_discards.remove(player_id);
    }

    pub fn has_pending_discards(&self) -> bool {
        !self.pending_discards.is_empty()
    }

    pub fn record_cheat(&mut self, player_id: &str) {
        *self.cheat_counts.entry(player_id.to_string()).or_insert(0) += 1;
    }

    pub fn cheat_count(&self, player_id: &str) -> u32 {
        self.cheat_counts.get(player_id).copied().unwrap_or(0)
    }

    pub fn cheat_counts(&self) -> &HashMap<String, u32> {
        &self.cheat_counts
    }

    /// 尚未被举报抓到的作弊次数
    pub fn uncaught_cheats(&self, player_id: &str) -> u32 {
        let caught = self.caught_cheats.get(player_id).copied().unwrap_or(0);
        self.cheat_count(player_id).saturating_sub(caught)
    }

    pub fn mark_cheats_caught(&mut self, player_id: &str) {
        let count = self.cheat_count(player_id);
        self.caught_cheats.insert(player_id.to_string(), count);
    }

    pub fn record_report(&mut self, reporter_id: &str, reported_id: &str) {
        *self.report_counts.entry(reporter_id.to_string()).or_insert(0) += 1;
        self.report_records.push(ReportRecord {
            reporter_id: reporter_id.to_string(),
            reported_id: reported_id.to_string(),
        });
    }

    pub fn report_count(&self, player_id: &str) -> u32 {
        self.report_counts.get(player_id).copied().unwrap_or(0)
    }

    pub fn report_counts(&self) -> &HashMap<String, u32> {
        &self.report_counts
    }

    pub fn report_records(&self) -> &[ReportRecord] {
        &self.report_records
    }

    pub fn reset_for_new_game(&mut self) {
        self.game_started = false;
        self.active_player = None;
        self.player_order.clear();
        self.ready_players.clear();
        self.rounds_played = 0;
        self.turn = TurnState::default();
        self.robber_pending = false;
        self.pending_discards.clear();
        self.cheat_counts.clear();
        self.caught_cheats.clear();
        self.report_counts.clear();
        self.report_records.clear();
    }
}

#[cfg(test)]
#[path = "lobby_test.rs"]
mod tests;
