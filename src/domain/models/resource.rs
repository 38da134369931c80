// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// 地块类型
///
/// 除 `Waste`（沙漠）外，每种地块类型同时也是一种玩家可持有的资源。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Wheat,
    Sheep,
    Wood,
    Clay,
    Ore,
    Waste,
}

/// 资源数量映射，键的顺序固定，便于序列化输出稳定
pub type ResourceMap = BTreeMap<TileType, u32>;

impl TileType {
    /// 所有可持有的资源类型
    pub const fn resources() -> [TileType; 5] {
        [
            TileType::Wheat,
            TileType::Sheep,
            TileType::Wood,
            TileType::Clay,
            TileType::Ore,
        ]
    }

    pub fn is_resource(&self) -> bool {
        *self != TileType::Waste
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TileType::Wheat => write!(f, "WHEAT"),
            TileType::Sheep => write!(f, "SHEEP"),
            TileType::Wood => write!(f, "WOOD"),
            TileType::Clay => write!(f, "CLAY"),
            TileType::Ore => write!(f, "ORE"),
            TileType::Waste => write!(f, "WASTE"),
        }
    }
}

impl FromStr for TileType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WHEAT" => Ok(TileType::Wheat),
            "SHEEP" => Ok(TileType::Sheep),
            "WOOD" => Ok(TileType::Wood),
            "CLAY" => Ok(TileType::Clay),
            "ORE" => Ok(TileType::Ore),
            "WASTE" => Ok(TileType::Waste),
            _ => Err(()),
        }
    }
}

/// 资源总数，溢出时返回 `None`
pub fn total(resources: &ResourceMap) -> Option<u32> {
    resources
        .values()
        .try_fold(0u32, |sum, amount| sum.checked_add(*amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!("ORE".parse::<TileType>(), Ok(TileType::Ore));
        assert!("ore".parse::<TileType>().is_err());
        assert!("GOLD".parse::<TileType>().is_err());
    }

    #[test]
    fn test_resources_exclude_waste() {
        assert!(!TileType::resources().contains(&TileType::Waste));
        assert!(!TileType::Waste.is_resource());
    }

    #[test]
    fn test_map_serializes_with_upper_case_keys() {
        let mut map = ResourceMap::new();
        map.insert(TileType::Wood, 4);
        map.insert(TileType::Sheep, 1);
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["WOOD"], 4);
        assert_eq!(value["SHEEP"], 1);

        let parsed: ResourceMap = serde_json::from_str(r#"{"CLAY":2}"#).unwrap();
        assert_eq!(parsed.get(&TileType::Clay), Some(&2));
        assert_eq!(total(&parsed), Some(2));
    }
}
