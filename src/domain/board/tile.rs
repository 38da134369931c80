// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::board::hex::Axial;
use crate::domain::models::resource::TileType;
use serde::Serialize;

/// 棋盘地块
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub id: usize,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    /// 产出点数，沙漠为 0
    pub value: u32,
    pub coordinates: [f64; 2],
    pub is_robbed: bool,
    #[serde(skip)]
    pub axial: Axial,
    /// 周围六个建筑位置的 id
    #[serde(skip)]
    pub site_ids: Vec<usize>,
}

impl Tile {
    pub fn produces_on(&self, roll: u32) -> bool {
        self.tile_type.is_resource() && !self.is_robbed && self.value == roll
    }
}
