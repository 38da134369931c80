// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::development_card::DevelopmentCard;
use crate::domain::models::resource::{self, ResourceMap, TileType};
use crate::utils::errors::GameError;
use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Uuid;

/// WebSocket 连接标识
pub type ConnectionId = Uuid;

const STARTING_RESOURCES: [(TileType, u32); 5] = [
    (TileType::Wheat, 2),
    (TileType::Sheep, 2),
    (TileType::Wood, 4),
    (TileType::Clay, 4),
    (TileType::Ore, 0),
];

/// 玩家实体
///
/// 玩家在建立连接时创建，资源与胜利点数随对局变化。
/// 资源映射始终包含全部五种资源（数量可以为 0），沙漠永不出现。
#[derive(Debug, Clone)]
pub struct Player {
    pub id: String,
    pub username: String,
    pub connection_id: Option<ConnectionId>,
    pub victory_points: u32,
    resources: ResourceMap,
    development_cards: Vec<DevelopmentCard>,
}

impl Player {
    pub fn new(connection_id: Option<ConnectionId>) -> Self {
        let suffix: u32 = rand::rng().random_range(0..10_000);
        Self::with_username(format!("RandomPlayer_{}", suffix), connection_id)
    }

    pub fn with_username(username: impl Into<String>, connection_id: Option<ConnectionId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            connection_id,
            victory_points: 0,
            resources: starting_resources(),
            development_cards: Vec::new(),
        }
    }

    pub fn resources(&self) -> &ResourceMap {
        &self.resources
    }

    pub fn resource_count(&self, resource: TileType) -> u32 {
        self.resources.get(&resource).copied().unwrap_or(0)
    }

    pub fn total_resources(&self) -> u32 {
        resource::total(&self.resources).unwrap_or(u32::MAX)
    }

    pub fn receive_resource(&mut self, resource: TileType, amount: u32) {
        if !resource.is_resource() {
            return;
        }
        let held = self.resources.entry(resource).or_insert(0);
        *held = held.saturating_add(amount);
    }

    pub fn remove_resource(&mut self, resource: TileType, amount: u32) -> Result<(), GameError> {
        if !resource.is_resource() {
            return Ok(());
        }
        let current = self.resources.entry(resource).or_insert(0);
        if *current < amount {
            return Err(GameError::InsufficientResources);
        }
        *current -= amount;
        Ok(())
    }

    pub fn has_resources(&self, required: &ResourceMap) -> bool {
        required
            .iter()
            .filter(|(resource, _)| resource.is_resource())
            .all(|(resource, amount)| self.resource_count(*resource) >= *amount)
    }

    pub fn receive_resources(&mut self, resources: &ResourceMap) {
        for (resource, amount) in resources {
            self.receive_resource(*resource, *amount);
        }
    }

    /// 一次性扣除多种资源；任一不足时不做任何修改
    pub fn remove_resources(&mut self, resources: &ResourceMap) -> Result<(), GameError> {
        if !self.has_resources(resources) {
            return Err(GameError::InsufficientResources);
        }
        for (resource, amount) in resources {
            self.remove_resource(*resource, *amount)?;
        }
        Ok(())
    }

    /// 随机拿走一张资源卡，手牌为空时返回 `None`
    pub fn take_random_resource(&mut self) -> Option<TileType> {
        let held: Vec<TileType> = self
            .resources
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(resource, _)| *resource)
            .collect();
        let resource = *held.choose(&mut rand::rng())?;
        self.remove_resource(resource, 1).ok()?;
        Some(resource)
    }

    pub fn development_cards(&self) -> &[DevelopmentCard] {
        &self.development_cards
    }

    pub fn add_development_card(&mut self, card: DevelopmentCard) {
        self.development_cards.push(card);
    }

    pub fn victory_point_cards(&self) -> u32 {
        self.development_cards
            .iter()
            .filter(|card| **card == DevelopmentCard::VictoryPoint)
            .count() as u32
    }

    pub fn reset_for_new_game(&mut self) {
        self.resources = starting_resources();
        self.victory_points = 0;
        self.development_cards.clear();
    }
}

fn starting_resources() -> ResourceMap {
    STARTING_RESOURCES.into_iter().collect()
}
