// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::player_color::PlayerColor;
use serde::Serialize;

/// 连接两个建筑位置的道路
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Road {
    pub id: usize,
    pub owner: Option<String>,
    pub color: Option<PlayerColor>,
    /// 道路中点
    pub coordinates: [f64; 2],
    /// 弧度
    pub rotation_angle: f64,
    #[serde(skip)]
    pub site_ids: [usize; 2],
}

impl Road {
    pub fn is_owned_by(&self, player_id: &str) -> bool {
        self.owner.as_deref() == Some(player_id)
    }

    /// 给定一端，返回另一端的建筑位置
    pub fn other_end(&self, site_id: usize) -> usize {
        if self.site_ids[0] == site_id {
            self.site_ids[1]
        } else {
            self.site_ids[0]
        }
    }
}
