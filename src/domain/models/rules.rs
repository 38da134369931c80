// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;

/// 对局规则参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GameRules {
    /// 获胜所需胜利点数
    pub win_threshold: u32,
    /// 大厅最大人数
    pub max_players: usize,
    /// 每位玩家每局最多作弊次数
    pub max_cheats_per_player: u32,
    /// 每位玩家每局最多举报次数
    pub max_reports_per_player: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            win_threshold: 10,
            max_players: 6,
            max_cheats_per_player: 2,
            max_reports_per_player: 2,
        }
    }
}
