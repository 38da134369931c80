// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Serialize, Serializer};
use std::fmt;

/// 玩家颜色
///
/// 序列化为十六进制色值。`None` 仅作为占位，不会分配给玩家。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    Red,
    Blue,
    Yellow,
    Purple,
    Green,
    Orange,
    None,
}

impl PlayerColor {
    pub const fn hex_code(&self) -> &'static str {
        match self {
            PlayerColor::Red => "#BD2828",
            PlayerColor::Blue => "#0080B3",
            PlayerColor::Yellow => "#DB9224",
            PlayerColor::Purple => "#B62FB2",
            PlayerColor::Green => "#008000",
            PlayerColor::Orange => "#CF6D17",
            PlayerColor::None => "#CCCCCC",
        }
    }

    /// 可分配给玩家的颜色
    pub const fn assignable() -> [PlayerColor; 6] {
        [
            PlayerColor::Red,
            PlayerColor::Blue,
            PlayerColor::Yellow,
            PlayerColor::Purple,
            PlayerColor::Green,
            PlayerColor::Orange,
        ]
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.hex_code())
    }
}

impl Serialize for PlayerColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_not_assignable() {
        assert_eq!(PlayerColor::assignable().len(), 6);
        assert!(!PlayerColor::assignable().contains(&PlayerColor::None));
    }

    #[test]
    fn test_serializes_as_hex() {
        let value = serde_json::to_value(PlayerColor::Blue).unwrap();
        assert_eq!(value, "#0080B3");
    }
}
