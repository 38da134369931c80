// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// 发展卡
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DevelopmentCard {
    Knight,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
    VictoryPoint,
}

const DECK_COMPOSITION: [(DevelopmentCard, usize); 5] = [
    (DevelopmentCard::Knight, 14),
    (DevelopmentCard::RoadBuilding, 2),
    (DevelopmentCard::YearOfPlenty, 2),
    (DevelopmentCard::Monopoly, 2),
    (DevelopmentCard::VictoryPoint, 5),
];

/// 发展卡牌堆，创建时洗牌
#[derive(Debug, Clone)]
pub struct DevelopmentCardDeck {
    cards: Vec<DevelopmentCard>,
}

impl DevelopmentCardDeck {
    pub fn new() -> Self {
        let mut cards: Vec<DevelopmentCard> = DECK_COMPOSITION
            .iter()
            .flat_map(|(card, count)| std::iter::repeat(*card).take(*count))
            .collect();
        cards.shuffle(&mut rand::rng());
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<DevelopmentCard> {
        self.cards.pop()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for DevelopmentCardDeck {
    fn default() -> Self {
        Self::new()
    }
}
