// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::resource::TileType;
use crate::domain::models::trade::TradeRequest;
use serde::Serialize;

pub const GENERAL_PORT_RATIO: u32 = 3;
pub const SPECIFIC_PORT_RATIO: u32 = 2;

/// 港口类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// 任意资源 3:1
    General,
    /// 指定资源 2:1
    Specific(TileType),
}

/// 港口在棋盘上的渲染位置
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub id: usize,
    pub kind: PortKind,
    pub transform: Transform,
    pub site_ids: [usize; 2],
}

impl Port {
    pub fn input_resource_amount(&self) -> u32 {
        match self.kind {
            PortKind::General => GENERAL_PORT_RATIO,
            PortKind::Specific(_) => SPECIFIC_PORT_RATIO,
        }
    }

    /// 判断交易请求是否满足本港口的兑换比例
    pub fn can_trade(&self, request: &TradeRequest) -> bool {
        let ratio = self.input_resource_amount();
        if !request.matches_ratio(ratio) {
            return false;
        }
        match self.kind {
            PortKind::General => request
                .offered_resources
                .values()
                .all(|amount| amount % ratio == 0),
            PortKind::Specific(resource) => request.offers_only(resource),
        }
    }
}

impl Serialize for Port {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct PortVisuals {
            port_transform: Transform,
            #[serde(rename = "settlementPosition1Id")]
            settlement_position_1_id: usize,
            #[serde(rename = "settlementPosition2Id")]
            settlement_position_2_id: usize,
        }

        let (port_type, resource) = match self.kind {
            PortKind::General => ("GeneralPort", None),
            PortKind::Specific(resource) => ("SpecificResourcePort", Some(resource)),
        };
        let mut state = serializer.serialize_struct("Port", 4)?;
        state.serialize_field("inputResourceAmount", &self.input_resource_amount())?;
        state.serialize_field("portType", port_type)?;
        if let Some(resource) = resource {
            state.serialize_field("resource", &resource)?;
        }
        state.serialize_field(
            "portVisuals",
            &PortVisuals {
                port_transform: self.transform,
                settlement_position_1_id: self.site_ids[0],
                settlement_position_2_id: self.site_ids[1],
            },
        )?;
        state.end()
    }
}
