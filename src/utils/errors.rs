// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 游戏领域错误类型
///
/// 每个变体的 `Display` 文本会原样放入 `ERROR` 消息返回给客户端，
/// 因此这些文本属于协议的一部分。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("ID of Lobby must not be empty")]
    EmptyLobbyId,

    #[error("Lobby with id {0} not found")]
    LobbyNotFound(String),

    #[error("Player with id {0} not found")]
    PlayerNotFound(String),

    #[error("Gameboard for lobby {0} not found")]
    BoardNotFound(String),

    #[error("Trade request not found: id = {0}")]
    TradeNotFound(String),

    #[error("Settlement position not found: id = {0}")]
    SettlementPositionNotFound(usize),

    #[error("Road not found: id = {0}")]
    RoadNotFound(usize),

    #[error("Tile not found: id = {0}")]
    TileNotFound(usize),

    #[error("No color for player found: playerId={player_id}, lobbyId={lobby_id}")]
    ColorNotFound { player_id: String, lobby_id: String },

    #[error("Failed to join lobby: lobby session not found or full")]
    JoinLobbyFailed,

    #[error("Starting game failed")]
    StartGameFailed,

    #[error("It is not your turn!")]
    NotYourTurn,

    #[error("Insufficient resources!")]
    InsufficientResources,

    #[error("Intersection occupied!")]
    IntersectionOccupied,

    #[error("Too close to another settlement or city")]
    SpacingRuleViolation,

    #[error("No adjacent roads found")]
    NoAdjacentRoad,

    #[error("You've reached the {building} limit of {limit}!")]
    BuildableLimitReached { building: String, limit: u32 },

    #[error("Only one settlement and one road may be placed per player during this setup round.")]
    SetupLimitExceeded,

    #[error("Please place at least one road and one settlement before ending your turn!")]
    MissingRequiredStructures,

    #[error("Dice may only be rolled once per turn!")]
    DiceAlreadyRolled,

    #[error("Robber must be placed before ending turn!")]
    RobberNotPlaced,

    #[error("One or more players must discard resources before ending turn!")]
    ResourcesNotDiscarded,

    #[error("Trade ratio is invalid")]
    InvalidTradeRatio,

    #[error("Invalid trade request format.")]
    InvalidTradeFormat,

    #[error("Invalid client command")]
    InvalidClientCommand,

    /// 不需要专门变体的规则违例
    #[error("{0}")]
    Rule(String),
}

impl GameError {
    pub fn rule(message: impl Into<String>) -> Self {
        GameError::Rule(message.into())
    }

    /// 是否表示资源不存在（REST 层据此返回 404）
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GameError::LobbyNotFound(_)
                | GameError::PlayerNotFound(_)
                | GameError::BoardNotFound(_)
                | GameError::TradeNotFound(_)
                | GameError::SettlementPositionNotFound(_)
                | GameError::RoadNotFound(_)
                | GameError::TileNotFound(_)
        )
    }
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("清理失败: {0}")]
    CleanupFailed(String),

    #[error("领域错误: {0}")]
    DomainError(#[from] GameError),
}
