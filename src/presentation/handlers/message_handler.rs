// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::{MessageDto, MessageType, PlayerInfo};
use crate::application::state::AppState;
use crate::domain::models::lobby::ReportOutcome;
use crate::domain::models::resource::{ResourceMap, TileType};
use crate::domain::models::trade::{PlayerTradeRequest, TradeRequest};
use crate::domain::services::trading_service::lobby_of_trade;
use crate::utils::errors::GameError;
use serde_json::{json, Value};
use tracing::{debug, info};

/// 发送给请求方的回复，按顺序写回连接
pub type Replies = Vec<MessageDto>;

/// 处理一条客户端消息
///
/// 发送者身份取自连接本身，消息中的 `player` 字段会被覆盖。
/// 返回值依次发送给请求方；其他玩家的通知在处理过程中经由连接中心发出。
pub fn handle_message(
    state: &AppState,
    sender_id: &str,
    mut message: MessageDto,
) -> Result<Replies, GameError> {
    if !message.message_type.is_client_command() {
        return Err(GameError::InvalidClientCommand);
    }
    message.player = Some(sender_id.to_string());
    debug!("{:?} from {}", message.message_type, sender_id);

    let ctx = Context {
        state,
        sender: sender_id,
        message: &message,
    };
    match message.message_type {
        MessageType::CreateLobby => ctx.create_lobby(),
        MessageType::JoinLobby => ctx.join_lobby(),
        MessageType::LeaveLobby => ctx.leave_lobby(),
        MessageType::SetUsername => ctx.set_username(),
        MessageType::SetReady => ctx.set_ready(),
        MessageType::StartGame => ctx.start_game(),
        MessageType::GetLobbies => ctx.get_lobbies(),
        MessageType::PlaceSettlement => ctx.place_settlement(),
        MessageType::UpgradeSettlement => ctx.upgrade_settlement(),
        MessageType::PlaceRoad => ctx.place_road(),
        MessageType::BuyDevelopmentCard => ctx.buy_development_card(),
        MessageType::RollDice => ctx.roll_dice(),
        MessageType::PlaceRobber => ctx.place_robber(),
        MessageType::DiscardResources => ctx.discard_resources(),
        MessageType::EndTurn => ctx.end_turn(),
        MessageType::TradeWithBank => ctx.trade_with_bank(),
        MessageType::CreatePlayerTradeRequest => ctx.create_player_trade(),
        MessageType::AcceptTradeRequest => ctx.accept_trade(),
        MessageType::RejectTradeRequest => ctx.reject_trade(),
        MessageType::CheatAttempt => ctx.cheat_attempt(),
        MessageType::ReportPlayer => ctx.report_player(),
        _ => Err(GameError::InvalidClientCommand),
    }
}

struct Context<'a> {
    state: &'a AppState,
    sender: &'a str,
    message: &'a MessageDto,
}

impl Context<'_> {
    fn lobby_id(&self) -> Result<&str, GameError> {
        self.message
            .lobby_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(GameError::EmptyLobbyId)
    }

    fn username(&self, player_id: &str) -> String {
        self.state
            .players
            .get_player(player_id)
            .map(|p| p.username)
            .unwrap_or_else(|_| player_id.to_string())
    }

    /// 构造带大厅玩家信息的消息
    fn lobby_message(&self, message_type: MessageType, payload: Value) -> Result<MessageDto, GameError> {
        self.message_for_lobby(self.lobby_id()?, message_type, payload)
    }

    fn message_for_lobby(
        &self,
        lobby_id: &str,
        message_type: MessageType,
        payload: Value,
    ) -> Result<MessageDto, GameError> {
        Ok(MessageDto::new(message_type)
            .with_player(self.sender)
            .with_lobby(lobby_id)
            .with_players(self.state.lobby_players(lobby_id)?)
            .with_message(payload))
    }

    /// 通知大厅中除发送者以外的成员
    fn notify(&self, message: &MessageDto) -> Result<(), GameError> {
        self.notify_lobby(self.lobby_id()?, message)
    }

    fn notify_lobby(&self, lobby_id: &str, message: &MessageDto) -> Result<(), GameError> {
        let members = self.state.lobby_members(lobby_id)?;
        self.state
            .hub
            .notify_lobby(&members, Some(self.sender), message);
        Ok(())
    }

    /// 通知大厅并把同一条消息回复给发送者
    fn broadcast_to_lobby(&self, message: MessageDto) -> Result<Replies, GameError> {
        self.notify(&message)?;
        Ok(vec![message])
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.message.message_field(key)
    }

    /// 读取数字 id，失败时用 `invalid` 生成错误
    fn id_field(&self, key: &str, invalid: impl FnOnce(String) -> GameError) -> Result<usize, GameError> {
        let value = self.field(key);
        value
            .and_then(Value::as_u64)
            .and_then(|id| usize::try_from(id).ok())
            .ok_or_else(|| invalid(value.map(Value::to_string).unwrap_or_else(|| "null".into())))
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    fn create_lobby(&self) -> Result<Replies, GameError> {
        let lobby_id = self.state.lobbies.create_lobby(self.sender)?;
        let color = self.state.lobbies.player_color(&lobby_id, self.sender)?;
        let reply = MessageDto::new(MessageType::LobbyCreated)
            .with_player(self.sender)
            .with_lobby(lobby_id.as_str())
            .with_players(self.state.lobby_players(&lobby_id)?)
            .with_message(json!({ "color": color }));
        Ok(vec![reply])
    }

    fn join_lobby(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id().map_err(|_| GameError::JoinLobbyFailed)?;
        let color = self.state.lobbies.join_lobby(lobby_id, self.sender)?;
        let update = self.lobby_message(MessageType::PlayerJoined, json!({ "color": color }))?;
        self.broadcast_to_lobby(update)
    }

    fn leave_lobby(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        let still_open = self.state.lobbies.leave_lobby(lobby_id, self.sender)?;
        if !still_open {
            self.state.games.remove_board(lobby_id);
            self.state.trading.remove_trades_for_lobby(lobby_id);
            let reply = MessageDto::new(MessageType::LobbyUpdated)
                .with_player(self.sender)
                .with_lobby(lobby_id);
            return Ok(vec![reply]);
        }
        let update = self.lobby_message(MessageType::LobbyUpdated, json!({ "left": self.sender }))?;
        let members = self.state.lobby_members(lobby_id)?;
        self.state.hub.notify_lobby(&members, None, &update);
        Ok(vec![update])
    }

    fn set_username(&self) -> Result<Replies, GameError> {
        let username = self
            .string_field("username")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GameError::rule("Username must not be empty"))?;
        self.state.players.set_username(self.sender, username)?;
        match self.message.lobby_id.as_deref() {
            Some(lobby_id) if self.state.lobbies.contains(lobby_id) => {
                let update =
                    self.lobby_message(MessageType::LobbyUpdated, json!({ "username": username }))?;
                self.broadcast_to_lobby(update)
            }
            _ => Ok(vec![MessageDto::new(MessageType::LobbyUpdated)
                .with_player(self.sender)
                .with_message(json!({ "username": username }))]),
        }
    }

    fn set_ready(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        let ready = self.state.lobbies.with_lobby_mut(lobby_id, |lobby| {
            if !lobby.contains_player(self.sender) {
                return Err(GameError::PlayerNotFound(self.sender.to_string()));
            }
            Ok(lobby.toggle_ready(self.sender))
        })?;
        let update = self.lobby_message(MessageType::LobbyUpdated, json!({ "ready": ready }))?;
        self.broadcast_to_lobby(update)
    }

    fn start_game(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        let gameboard = self.state.games.start_game(lobby_id, self.sender)?;
        let update = self.lobby_message(MessageType::GameStarted, json!({ "gameboard": gameboard }))?;
        self.broadcast_to_lobby(update)
    }

    fn get_lobbies(&self) -> Result<Replies, GameError> {
        let reply = MessageDto::new(MessageType::LobbyList)
            .with_player(self.sender)
            .with_message(json!({ "lobbies": self.state.open_lobbies() }));
        Ok(vec![reply])
    }

    /// 棋盘发生变化后的统一回复；若发送者已获胜则宣布胜利
    fn board_changed(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        if self.state.games.check_for_win(self.sender) {
            return self.game_won();
        }
        let gameboard = self.state.games.board_json(lobby_id)?;
        let update = self.lobby_message(self.message.message_type, json!({ "gameboard": gameboard }))?;
        self.broadcast_to_lobby(update)
    }

    fn game_won(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        let lobby = self.state.lobbies.get_lobby(lobby_id)?;
        let leaderboard: Vec<PlayerInfo> = self
            .state
            .games
            .leaderboard(lobby_id)?
            .iter()
            .map(|player| PlayerInfo::from_parts(player, &lobby))
            .collect();
        let winner = self.username(self.sender);
        let update = self.lobby_message(
            MessageType::GameWon,
            json!({ "winner": winner, "leaderboard": leaderboard }),
        )?;
        self.notify(&update)?;
        self.state.games.finish_game(lobby_id)?;
        self.state.trading.remove_trades_for_lobby(lobby_id);
        info!("{} won the game in lobby {}", winner, lobby_id);
        Ok(vec![update])
    }

    fn place_settlement(&self) -> Result<Replies, GameError> {
        let site_id = self.id_field("settlementPositionId", |raw| {
            GameError::rule(format!("Invalid settlement position id: id = {}", raw))
        })?;
        self.state
            .games
            .place_settlement(self.lobby_id()?, self.sender, site_id)?;
        self.board_changed()
    }

    fn upgrade_settlement(&self) -> Result<Replies, GameError> {
        let site_id = self.id_field("settlementPositionId", |raw| {
            GameError::rule(format!("Invalid settlement position id: id = {}", raw))
        })?;
        self.state
            .games
            .upgrade_settlement(self.lobby_id()?, self.sender, site_id)?;
        self.board_changed()
    }

    fn place_road(&self) -> Result<Replies, GameError> {
        let road_id = self.id_field("roadId", |raw| {
            GameError::rule(format!("Invalid road id: id = {}", raw))
        })?;
        self.state
            .games
            .place_road(self.lobby_id()?, self.sender, road_id)?;
        self.board_changed()
    }

    fn buy_development_card(&self) -> Result<Replies, GameError> {
        let card = self
            .state
            .games
            .buy_development_card(self.lobby_id()?, self.sender)?;
        if self.state.games.check_for_win(self.sender) {
            return self.game_won();
        }
        let update = self.lobby_message(MessageType::PlayerResourceUpdate, json!({ "card": card }))?;
        self.broadcast_to_lobby(update)
    }

    fn roll_dice(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        let outcome = self.state.games.roll_dice(lobby_id, self.sender)?;
        let dice = self.lobby_message(MessageType::DiceResult, json!(outcome.dice))?;
        self.notify(&dice)?;
        if !outcome.dice.activates_robber() {
            return Ok(vec![dice]);
        }
        let robber = self.lobby_message(
            MessageType::RobberPhase,
            json!({
                "gameboard": self.state.games.board_json(lobby_id)?,
                "discards": outcome.discards,
            }),
        )?;
        self.notify(&robber)?;
        Ok(vec![dice, robber])
    }

    fn place_robber(&self) -> Result<Replies, GameError> {
        let tile_id = self.id_field("tileId", |raw| {
            GameError::rule(format!("Invalid tile id = {}", raw))
        })?;
        let lobby_id = self.lobby_id()?;
        let robbery = self.state.games.place_robber(lobby_id, self.sender, tile_id)?;
        let mut payload = json!({ "gameboard": self.state.games.board_json(lobby_id)? });
        if let Some(robbery) = robbery {
            payload["robbedPlayer"] = json!(robbery.victim);
        }
        let update = self.lobby_message(MessageType::PlaceRobber, payload)?;
        self.broadcast_to_lobby(update)
    }

    fn discard_resources(&self) -> Result<Replies, GameError> {
        let resources: ResourceMap = self
            .field("resources")
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or_else(|| GameError::rule("Invalid discard request"))?;
        self.state
            .games
            .discard_resources(self.lobby_id()?, self.sender, &resources)?;
        let update = self.lobby_message(MessageType::PlayerResourceUpdate, json!({}))?;
        self.broadcast_to_lobby(update)
    }

    fn end_turn(&self) -> Result<Replies, GameError> {
        let lobby_id = self.lobby_id()?;
        self.state.games.end_turn(lobby_id, self.sender)?;
        let active = self
            .state
            .lobbies
            .with_lobby(lobby_id, |lobby| Ok(lobby.active_player().map(str::to_string)))?;
        let update = self.lobby_message(
            MessageType::NextTurn,
            json!({
                "gameboard": self.state.games.board_json(lobby_id)?,
                "activePlayer": active,
            }),
        )?;
        self.broadcast_to_lobby(update)
    }

    fn trade_with_bank(&self) -> Result<Replies, GameError> {
        let request: TradeRequest = self
            .message
            .message
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or(GameError::InvalidTradeFormat)?;
        self.state
            .trading
            .trade_with_bank(self.lobby_id()?, self.sender, &request)?;
        let update = self.lobby_message(MessageType::PlayerResourceUpdate, json!({}))?;
        self.broadcast_to_lobby(update)
    }

    fn create_player_trade(&self) -> Result<Replies, GameError> {
        let mut request: PlayerTradeRequest = self
            .message
            .message
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
            .ok_or(GameError::InvalidTradeFormat)?;
        request.source_player_id = self.sender.to_string();
        let lobby_id = self.lobby_id()?;
        let trade_id = self
            .state
            .trading
            .create_player_trade(lobby_id, request.clone())?;

        let offer = MessageDto::new(MessageType::TradeOffer)
            .with_player(self.sender)
            .with_lobby(lobby_id)
            .with_message(json!({ "tradeId": trade_id, "tradeRequest": request }));
        self.state.hub.send_to_player(&request.target_player_id, offer);

        let target_name = self.username(&request.target_player_id);
        Ok(vec![alert(
            self.sender,
            lobby_id,
            format!("Sent trade request to {}", target_name),
            "success",
        )])
    }

    fn trade_id(&self) -> Result<&str, GameError> {
        self.string_field("tradeId")
            .ok_or(GameError::InvalidTradeFormat)
    }

    /// 交易 id 自带大厅 id，通知以它为准
    fn trade_lobby(&self) -> Result<(&str, &str), GameError> {
        let trade_id = self.trade_id()?;
        let lobby_id = lobby_of_trade(trade_id)
            .ok_or_else(|| GameError::TradeNotFound(trade_id.to_string()))?;
        Ok((trade_id, lobby_id))
    }

    fn accept_trade(&self) -> Result<Replies, GameError> {
        let (trade_id, lobby_id) = self.trade_lobby()?;
        let request = self
            .state
            .trading
            .accept_player_trade(trade_id, self.sender)?;
        self.state.hub.send_to_player(
            &request.source_player_id,
            alert(
                self.sender,
                lobby_id,
                format!("Trade request was accepted by {}", self.username(self.sender)),
                "success",
            ),
        );
        let update = self.message_for_lobby(lobby_id, MessageType::PlayerResourceUpdate, json!({}))?;
        self.notify_lobby(lobby_id, &update)?;
        Ok(vec![update])
    }

    fn reject_trade(&self) -> Result<Replies, GameError> {
        let (trade_id, lobby_id) = self.trade_lobby()?;
        let request = self
            .state
            .trading
            .reject_player_trade(trade_id, self.sender)?;
        self.state.hub.send_to_player(
            &request.source_player_id,
            alert(
                self.sender,
                lobby_id,
                format!("Trade request was rejected by {}", self.username(self.sender)),
                "error",
            ),
        );
        Ok(Vec::new())
    }

    fn cheat_attempt(&self) -> Result<Replies, GameError> {
        let resource: TileType = self
            .string_field("resource")
            .and_then(|raw| raw.parse().ok())
            .ok_or_else(|| GameError::rule("Invalid resource type"))?;
        self.state
            .games
            .handle_cheat(self.lobby_id()?, self.sender, resource)?;
        let update = self.lobby_message(MessageType::PlayerResourceUpdate, json!({}))?;
        self.broadcast_to_lobby(update)
    }

    fn report_player(&self) -> Result<Replies, GameError> {
        let reported = self
            .string_field("reportedId")
            .ok_or_else(|| GameError::rule("Invalid player to report."))?;
        let lobby_id = self.lobby_id()?;
        let outcome = self
            .state
            .games
            .handle_report(lobby_id, self.sender, reported)?;
        let name = self.username(reported);
        let (text, severity) = match outcome {
            ReportOutcome::CorrectReportNew => (format!("{} got caught cheating!", name), "success"),
            ReportOutcome::CorrectReportAlreadyCaught => {
                (format!("{} was already caught cheating", name), "error")
            }
            ReportOutcome::FalseReport => {
                (format!("You falsely accused {} of cheating!", name), "error")
            }
        };
        let update = self.lobby_message(MessageType::PlayerResourceUpdate, json!({}))?;
        self.notify(&update)?;
        Ok(vec![alert(self.sender, lobby_id, text, severity), update])
    }
}

fn alert(player: &str, lobby_id: &str, text: String, severity: &str) -> MessageDto {
    MessageDto::new(MessageType::Alert)
        .with_player(player)
        .with_lobby(lobby_id)
        .with_message(json!({ "message": text, "severity": severity }))
}

#[cfg(test)]
#[path = "message_handler_test.rs"]
mod tests;
