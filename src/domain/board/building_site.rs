// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::building::Building;
use serde::Serialize;

/// 建筑位置（地块的角）
///
/// 最多与 3 个地块和 3 条道路相邻。
#[derive(Debug, Clone, Serialize)]
pub struct BuildingSite {
    pub id: usize,
    pub building: Option<Building>,
    pub coordinates: [f64; 2],
    #[serde(skip)]
    pub tile_ids: Vec<usize>,
    #[serde(skip)]
    pub road_ids: Vec<usize>,
    #[serde(skip)]
    pub port_id: Option<usize>,
}

impl BuildingSite {
    pub fn owner(&self) -> Option<&str> {
        self.building.as_ref().map(|b| b.owner.as_str())
    }

    pub fn is_owned_by(&self, player_id: &str) -> bool {
        self.owner() == Some(player_id)
    }

    /// 被其他玩家的建筑占据
    pub fn is_blocked_for(&self, player_id: &str) -> bool {
        matches!(self.owner(), Some(owner) if owner != player_id)
    }
}
