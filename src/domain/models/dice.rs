// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::Rng;
use serde::Serialize;

pub const ROBBER_ROLL: u32 = 7;

/// 一次掷骰结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceResult {
    pub dice1: u32,
    pub dice2: u32,
    pub total: u32,
}

impl DiceResult {
    pub fn new(dice1: u32, dice2: u32) -> Self {
        Self {
            dice1,
            dice2,
            total: dice1 + dice2,
        }
    }

    pub fn activates_robber(&self) -> bool {
        self.total == ROBBER_ROLL
    }
}

/// 两枚六面骰
#[derive(Debug, Clone, Default)]
pub struct DiceRoller;

impl DiceRoller {
    pub fn roll(&self) -> DiceResult {
        let mut rng = rand::rng();
        DiceResult::new(rng.random_range(1..=6), rng.random_range(1..=6))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_range() {
        let roller = DiceRoller;
        for _ in 0..200 {
            let result = roller.roll();
            assert!((1..=6).contains(&result.dice1));
            assert!((1..=6).contains(&result.dice2));
            assert_eq!(result.total, result.dice1 + result.dice2);
        }
    }

    #[test]
    fn test_seven_activates_robber() {
        assert!(DiceResult::new(3, 4).activates_robber());
        assert!(!DiceResult::new(3, 3).activates_robber());
    }
}
