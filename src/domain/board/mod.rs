// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 棋盘模块
///
/// 使用轴向六边形坐标生成棋盘，并实现建造、产出、强盗与最长道路规则
pub mod building_site;
pub mod generator;
pub mod hex;
pub mod longest_road;
pub mod port;
pub mod road;
pub mod tile;

use crate::domain::models::building::{Building, BuildingType};
use crate::domain::models::development_card::{DevelopmentCard, DevelopmentCardDeck};
use crate::domain::models::player_color::PlayerColor;
use crate::domain::models::resource::TileType;
use crate::utils::errors::GameError;
use building_site::BuildingSite;
use port::Port;
use road::Road;
use serde_json::{json, Value};
use tile::Tile;

pub const SIZE_OF_HEX: u32 = 10;

/// 根据玩家数量决定棋盘环数
pub fn rings_for_players(player_count: usize) -> Result<usize, GameError> {
    match player_count {
        0 | 1 => Err(GameError::rule("Number of players must be at least 2")),
        2..=4 => Ok(3),
        5..=6 => Ok(4),
        _ => Ok(5),
    }
}

/// 单次产出：`owner` 获得 `amount` 个 `resource`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub owner: String,
    pub resource: TileType,
    pub amount: u32,
}

/// 一局游戏的棋盘
#[derive(Debug, Clone)]
pub struct GameBoard {
    rings: usize,
    tiles: Vec<Tile>,
    sites: Vec<BuildingSite>,
    roads: Vec<Road>,
    ports: Vec<Port>,
    robber_tile: usize,
    longest_road_holder: Option<String>,
    deck: DevelopmentCardDeck,
}

impl GameBoard {
    pub fn new(player_count: usize) -> Result<Self, GameError> {
        Ok(Self::with_rings(rings_for_players(player_count)?))
    }

    pub fn with_rings(rings: usize) -> Self {
        let layout = generator::generate(rings, SIZE_OF_HEX as f64);
        Self {
            rings,
            tiles: layout.tiles,
            sites: layout.sites,
            roads: layout.roads,
            ports: layout.ports,
            robber_tile: layout.robber_tile,
            longest_road_holder: None,
            deck: DevelopmentCardDeck::new(),
        }
    }

    pub fn rings(&self) -> usize {
        self.rings
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn sites(&self) -> &[BuildingSite] {
        &self.sites
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    pub fn robber_tile(&self) -> usize {
        self.robber_tile
    }

    pub fn longest_road_holder(&self) -> Option<&str> {
        self.longest_road_holder.as_deref()
    }

    pub fn tile(&self, id: usize) -> Result<&Tile, GameError> {
        id.checked_sub(1)
            .and_then(|i| self.tiles.get(i))
            .ok_or(GameError::TileNotFound(id))
    }

    pub fn site(&self, id: usize) -> Result<&BuildingSite, GameError> {
        id.checked_sub(1)
            .and_then(|i| self.sites.get(i))
            .ok_or(GameError::SettlementPositionNotFound(id))
    }

    pub fn road(&self, id: usize) -> Result<&Road, GameError> {
        id.checked_sub(1)
            .and_then(|i| self.roads.get(i))
            .ok_or(GameError::RoadNotFound(id))
    }

    /// 与建筑位置通过道路相连的其他建筑位置
    fn neighbours(&self, site: &BuildingSite) -> impl Iterator<Item = &BuildingSite> + '_ {
        let site_id = site.id;
        site.road_ids
            .clone()
            .into_iter()
            .map(move |road_id| &self.sites[self.roads[road_id - 1].other_end(site_id) - 1])
    }

    pub fn place_settlement(
        &mut self,
        player_id: &str,
        color: PlayerColor,
        site_id: usize,
    ) -> Result<(), GameError> {
        let site = self.site(site_id)?;
        if site.building.is_some() {
            return Err(GameError::IntersectionOccupied);
        }
        if self.neighbours(site).any(|n| n.building.is_some()) {
            return Err(GameError::SpacingRuleViolation);
        }
        let has_own_road = site
            .road_ids
            .iter()
            .any(|road_id| self.roads[road_id - 1].is_owned_by(player_id));
        if !has_own_road {
            return Err(GameError::NoAdjacentRoad);
        }
        self.sites[site_id - 1].building = Some(Building::settlement(player_id, color));
        Ok(())
    }

    pub fn upgrade_settlement(
        &mut self,
        player_id: &str,
        color: PlayerColor,
        site_id: usize,
    ) -> Result<(), GameError> {
        let site = self.site(site_id)?;
        match &site.building {
            Some(building) if building.is_owned_by(player_id) => {
                if building.kind == BuildingType::City {
                    return Err(GameError::rule("This settlement is already a city"));
                }
            }
            Some(_) => return Err(GameError::IntersectionOccupied),
            None => {
                return Err(GameError::rule(
                    "A city can only be built on one of your settlements",
                ))
            }
        }
        self.sites[site_id - 1].building = Some(Building::city(player_id, color));
        Ok(())
    }

    /// 放置道路
    ///
    /// 准备轮内道路可以放在任意空位；常规轮次必须连接自己的建筑，
    /// 或在未被对手建筑占据的端点连接自己的道路。
    pub fn place_road(
        &mut self,
        player_id: &str,
        color: PlayerColor,
        road_id: usize,
        setup_round: bool,
    ) -> Result<(), GameError> {
        let road = self.road(road_id)?;
        if road.owner.is_some() {
            return Err(GameError::rule(format!(
                "Road cannot be placed twice: roadId = {}, playerId = {}",
                road_id, player_id
            )));
        }
        if !setup_round && !self.road_connects(player_id, road) {
            return Err(GameError::rule(
                "Road must connect to your existing roads or buildings",
            ));
        }
        let road = &mut self.roads[road_id - 1];
        road.owner = Some(player_id.to_string());
        road.color = Some(color);
        Ok(())
    }

    fn road_connects(&self, player_id: &str, road: &Road) -> bool {
        road.site_ids.iter().any(|&site_id| {
            let site = &self.sites[site_id - 1];
            if site.is_owned_by(player_id) {
                return true;
            }
            !site.is_blocked_for(player_id)
                && site
                    .road_ids
                    .iter()
                    .any(|other| *other != road.id && self.roads[other - 1].is_owned_by(player_id))
        })
    }

    pub fn count_buildings(&self, player_id: &str, kind: BuildingType) -> u32 {
        match kind {
            BuildingType::Road => self.roads.iter().filter(|r| r.is_owned_by(player_id)).count() as u32,
            BuildingType::Settlement | BuildingType::City => self
                .sites
                .iter()
                .filter_map(|s| s.building.as_ref())
                .filter(|b| b.is_owned_by(player_id) && b.kind == kind)
                .count() as u32,
            BuildingType::DevelopmentCard => 0,
        }
    }

    /// 掷出 `roll` 后的资源产出
    pub fn distribute_resources(&self, roll: u32) -> Vec<Production> {
        let mut productions = Vec::new();
        for tile in self.tiles.iter().filter(|t| t.produces_on(roll)) {
            for site_id in &tile.site_ids {
                if let Some(building) = &self.sites[site_id - 1].building {
                    productions.push(Production {
                        owner: building.owner.clone(),
                        resource: tile.tile_type,
                        amount: building.kind.production(),
                    });
                }
            }
        }
        productions
    }

    pub fn move_robber(&mut self, tile_id: usize) -> Result<(), GameError> {
        self.tile(tile_id)?;
        if tile_id == self.robber_tile {
            return Err(GameError::rule("Robber must be moved to another tile"));
        }
        self.tiles[self.robber_tile - 1].is_robbed = false;
        self.tiles[tile_id - 1].is_robbed = true;
        self.robber_tile = tile_id;
        Ok(())
    }

    /// 地块周围拥有建筑的玩家（去重）
    pub fn players_adjacent_to_tile(&self, tile_id: usize) -> Result<Vec<String>, GameError> {
        let tile = self.tile(tile_id)?;
        let mut owners: Vec<String> = Vec::new();
        for site_id in &tile.site_ids {
            if let Some(owner) = self.sites[site_id - 1].owner() {
                if !owners.iter().any(|o| o == owner) {
                    owners.push(owner.to_string());
                }
            }
        }
        Ok(owners)
    }

    /// 玩家建筑可使用的港口
    pub fn ports_of(&self, player_id: &str) -> Vec<&Port> {
        let mut ports: Vec<&Port> = Vec::new();
        for site in self.sites.iter().filter(|s| s.is_owned_by(player_id)) {
            if let Some(port) = site.port_id.and_then(|id| self.ports.get(id - 1)) {
                if !ports.iter().any(|p| p.id == port.id) {
                    ports.push(port);
                }
            }
        }
        ports
    }

    pub fn longest_road_length(&self, player_id: &str) -> usize {
        longest_road::longest_road_length(player_id, &self.sites, &self.roads)
    }

    /// 重新计算最长道路归属，返回当前持有者
    pub fn update_longest_road(&mut self) -> Option<&str> {
        let mut owners: Vec<String> = Vec::new();
        for owner in self.roads.iter().filter_map(|r| r.owner.as_ref()) {
            if !owners.contains(owner) {
                owners.push(owner.clone());
            }
        }
        let lengths: Vec<(String, usize)> = owners
            .into_iter()
            .map(|owner| {
                let length = self.longest_road_length(&owner);
                (owner, length)
            })
            .collect();
        self.longest_road_holder =
            longest_road::resolve_holder(self.longest_road_holder.as_deref(), &lengths);
        self.longest_road_holder.as_deref()
    }

    /// 棋盘上获得的胜利点数：建筑点数加最长道路奖励
    pub fn victory_points_of(&self, player_id: &str) -> u32 {
        let buildings: u32 = self
            .sites
            .iter()
            .filter_map(|s| s.building.as_ref())
            .filter(|b| b.is_owned_by(player_id))
            .map(|b| b.kind.victory_points())
            .sum();
        let longest_road = if self.longest_road_holder.as_deref() == Some(player_id) {
            longest_road::LONGEST_ROAD_POINTS
        } else {
            0
        };
        buildings + longest_road
    }

    pub fn draw_development_card(&mut self) -> Option<DevelopmentCard> {
        self.deck.draw()
    }

    pub fn remaining_development_cards(&self) -> usize {
        self.deck.remaining()
    }

    pub fn to_json(&self) -> Value {
        json!({
            "tiles": self.tiles,
            "settlementPositions": self.sites,
            "roads": self.roads,
            "ports": self.ports,
            "ringsOfBoard": self.rings,
            "sizeOfHex": SIZE_OF_HEX,
        })
    }
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
