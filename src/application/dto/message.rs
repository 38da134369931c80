// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::lobby::Lobby;
use crate::domain::models::player::Player;
use crate::domain::models::player_color::PlayerColor;
use crate::domain::models::resource::ResourceMap;
use crate::domain::services::lobby_service::OpenLobby;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// WebSocket 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // 大厅
    CreateLobby,
    JoinLobby,
    LeaveLobby,
    SetUsername,
    SetReady,
    StartGame,
    GetLobbies,
    // 建造
    PlaceSettlement,
    UpgradeSettlement,
    PlaceRoad,
    BuyDevelopmentCard,
    // 回合
    RollDice,
    PlaceRobber,
    DiscardResources,
    EndTurn,
    // 交易
    TradeWithBank,
    CreatePlayerTradeRequest,
    AcceptTradeRequest,
    RejectTradeRequest,
    // 作弊
    CheatAttempt,
    ReportPlayer,

    // 以下仅由服务端发送
    ConnectionSuccessful,
    ClientDisconnected,
    Error,
    LobbyUpdated,
    PlayerJoined,
    LobbyCreated,
    LobbyList,
    GameBoardJson,
    GameStarted,
    GameWon,
    DiceResult,
    RobberPhase,
    NextTurn,
    PlayerResourceUpdate,
    TradeOffer,
    Alert,
}

impl MessageType {
    /// 客户端允许发送的消息类型
    pub fn is_client_command(&self) -> bool {
        matches!(
            self,
            MessageType::CreateLobby
                | MessageType::JoinLobby
                | MessageType::LeaveLobby
                | MessageType::SetUsername
                | MessageType::SetReady
                | MessageType::StartGame
                | MessageType::GetLobbies
                | MessageType::PlaceSettlement
                | MessageType::UpgradeSettlement
                | MessageType::PlaceRoad
                | MessageType::BuyDevelopmentCard
                | MessageType::RollDice
                | MessageType::PlaceRobber
                | MessageType::DiscardResources
                | MessageType::EndTurn
                | MessageType::TradeWithBank
                | MessageType::CreatePlayerTradeRequest
                | MessageType::AcceptTradeRequest
                | MessageType::RejectTradeRequest
                | MessageType::CheatAttempt
                | MessageType::ReportPlayer
        )
    }
}

/// 大厅内单个玩家的公开信息
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub id: String,
    pub username: String,
    pub color: Option<PlayerColor>,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_active_player: bool,
    pub can_roll_dice: bool,
    pub victory_points: u32,
    pub resources: ResourceMap,
}

impl PlayerInfo {
    pub fn from_parts(player: &Player, lobby: &Lobby) -> Self {
        Self {
            id: player.id.clone(),
            username: player.username.clone(),
            color: lobby.color_of(&player.id),
            is_host: lobby.is_host(&player.id),
            is_ready: lobby.is_ready(&player.id),
            is_active_player: lobby.is_player_turn(&player.id),
            can_roll_dice: lobby.can_roll_dice(&player.id),
            victory_points: player.victory_points,
            resources: player.resources().clone(),
        }
    }
}

/// 大厅列表项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyInfo {
    pub id: String,
    /// 房主用户名
    pub host_player: String,
    pub player_count: usize,
}

impl LobbyInfo {
    pub fn new(lobby: &OpenLobby, host_username: impl Into<String>) -> Self {
        Self {
            id: lobby.id.clone(),
            host_player: host_username.into(),
            player_count: lobby.player_count,
        }
    }
}

/// WebSocket 上传输的唯一消息格式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lobby_id: Option<String>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub players: Option<BTreeMap<String, PlayerInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl MessageDto {
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            player: None,
            lobby_id: None,
            players: None,
            message: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::new(MessageType::Error).with_message(json!({ "error": error.into() }))
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn with_lobby(mut self, lobby_id: impl Into<String>) -> Self {
        self.lobby_id = Some(lobby_id.into());
        self
    }

    pub fn with_players(mut self, players: BTreeMap<String, PlayerInfo>) -> Self {
        self.players = Some(players);
        self
    }

    pub fn with_message(mut self, message: Value) -> Self {
        self.message = Some(message);
        self
    }

    /// 读取 `message` 中的字段
    pub fn message_field(&self, key: &str) -> Option<&Value> {
        self.message.as_ref().and_then(|m| m.get(key))
    }
}
