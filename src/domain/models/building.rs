// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::player_color::PlayerColor;
use crate::domain::models::resource::{ResourceMap, TileType};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// 可建造物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingType {
    Settlement,
    City,
    Road,
    DevelopmentCard,
}

static BUILDING_COSTS: Lazy<HashMap<BuildingType, ResourceMap>> = Lazy::new(|| {
    HashMap::from([
        (
            BuildingType::Road,
            ResourceMap::from([(TileType::Wood, 1), (TileType::Clay, 1)]),
        ),
        (
            BuildingType::Settlement,
            ResourceMap::from([
                (TileType::Wood, 1),
                (TileType::Clay, 1),
                (TileType::Sheep, 1),
                (TileType::Wheat, 1),
            ]),
        ),
        (
            BuildingType::City,
            ResourceMap::from([(TileType::Wheat, 2), (TileType::Ore, 3)]),
        ),
        (
            BuildingType::DevelopmentCard,
            ResourceMap::from([
                (TileType::Sheep, 1),
                (TileType::Wheat, 1),
                (TileType::Ore, 1),
            ]),
        ),
    ])
});

impl BuildingType {
    /// 建造所需资源
    pub fn cost(&self) -> &'static ResourceMap {
        &BUILDING_COSTS[self]
    }

    /// 每位玩家可拥有的最大数量，发展卡不受限
    pub const fn limit(&self) -> Option<u32> {
        match self {
            BuildingType::Road => Some(15),
            BuildingType::Settlement => Some(5),
            BuildingType::City => Some(4),
            BuildingType::DevelopmentCard => None,
        }
    }

    pub const fn victory_points(&self) -> u32 {
        match self {
            BuildingType::Settlement => 1,
            BuildingType::City => 2,
            _ => 0,
        }
    }

    /// 掷骰产出时相邻地块给予的资源数量
    pub const fn production(&self) -> u32 {
        match self {
            BuildingType::Settlement => 1,
            BuildingType::City => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildingType::Settlement => write!(f, "Settlement"),
            BuildingType::City => write!(f, "City"),
            BuildingType::Road => write!(f, "Road"),
            BuildingType::DevelopmentCard => write!(f, "DevelopmentCard"),
        }
    }
}

/// 建筑位置上的建筑（村庄或城市）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub owner: String,
    pub color: PlayerColor,
    pub kind: BuildingType,
}

impl Building {
    pub fn settlement(owner: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            owner: owner.into(),
            color,
            kind: BuildingType::Settlement,
        }
    }

    pub fn city(owner: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            owner: owner.into(),
            color,
            kind: BuildingType::City,
        }
    }

    pub fn is_owned_by(&self, player_id: &str) -> bool {
        self.owner == player_id
    }
}

impl Serialize for Building {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Building", 3)?;
        state.serialize_field("owner", &self.owner)?;
        state.serialize_field("color", &self.color)?;
        state.serialize_field("type", &self.kind.to_string())?;
        state.end()
    }
}
