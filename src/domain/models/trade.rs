// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::resource::{self, ResourceMap, TileType};
use serde::{Deserialize, Serialize};

pub const BANK_TRADE_RATIO: u32 = 4;

/// 交易请求：用 `offered_resources` 换取 `target_resources`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub offered_resources: ResourceMap,
    pub target_resources: ResourceMap,
}

impl TradeRequest {
    pub fn new(offered_resources: ResourceMap, target_resources: ResourceMap) -> Self {
        Self {
            offered_resources,
            target_resources,
        }
    }

    pub fn offered_total(&self) -> Option<u32> {
        resource::total(&self.offered_resources)
    }

    pub fn target_total(&self) -> Option<u32> {
        resource::total(&self.target_resources)
    }

    /// 双方非空、不含沙漠、不含零数量条目
    pub fn is_well_formed(&self) -> bool {
        let side_ok = |side: &ResourceMap| {
            !side.is_empty()
                && side
                    .iter()
                    .all(|(resource, amount)| resource.is_resource() && *amount > 0)
        };
        side_ok(&self.offered_resources) && side_ok(&self.target_resources)
    }

    /// 同一资源同时出现在出价与目标中
    pub fn has_overlap(&self) -> bool {
        self.offered_resources
            .keys()
            .any(|resource| self.target_resources.contains_key(resource))
    }

    /// 按给定比例检查：出价总数可整除且 `出价 / 比例 == 目标总数`
    pub fn matches_ratio(&self, ratio: u32) -> bool {
        if ratio == 0 || !self.is_well_formed() || self.has_overlap() {
            return false;
        }
        match (self.offered_total(), self.target_total()) {
            (Some(offered), Some(target)) => offered % ratio == 0 && offered / ratio == target,
            _ => false,
        }
    }

    /// 银行 4:1 交易规则
    pub fn is_valid_bank_trade(&self) -> bool {
        self.matches_ratio(BANK_TRADE_RATIO)
            && self
                .offered_resources
                .values()
                .all(|amount| amount % BANK_TRADE_RATIO == 0)
    }

    pub fn offers_only(&self, resource: TileType) -> bool {
        self.offered_resources.keys().all(|r| *r == resource)
    }
}

/// 玩家之间的交易请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTradeRequest {
    #[serde(default)]
    pub source_player_id: String,
    pub target_player_id: String,
    pub trade: TradeRequest,
}
