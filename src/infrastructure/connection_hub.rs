// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::MessageDto;
use crate::domain::models::player::ConnectionId;
use crate::domain::services::player_service::PlayerService;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// 连接中心
///
/// 每个 WebSocket 连接对应一个无界发送通道，连接任务负责把通道中的消息写回套接字。
pub struct ConnectionHub {
    connections: DashMap<ConnectionId, UnboundedSender<MessageDto>>,
    players: Arc<PlayerService>,
}

impl ConnectionHub {
    pub fn new(players: Arc<PlayerService>) -> Self {
        Self {
            connections: DashMap::new(),
            players,
        }
    }

    /// 注册连接，返回其出站消息的接收端
    pub fn register(&self, connection_id: ConnectionId) -> UnboundedReceiver<MessageDto> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(connection_id, tx);
        debug!("Connection {} registered", connection_id);
        rx
    }

    pub fn unregister(&self, connection_id: ConnectionId) -> bool {
        self.connections.remove(&connection_id).is_some()
    }

    pub fn is_open(&self, connection_id: ConnectionId) -> bool {
        self.connections
            .get(&connection_id)
            .map(|tx| !tx.is_closed())
            .unwrap_or(false)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn send_to_connection(&self, connection_id: ConnectionId, message: MessageDto) -> bool {
        match self.connections.get(&connection_id) {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }

    pub fn send_to_player(&self, player_id: &str, message: MessageDto) -> bool {
        match self.players.connection_of(player_id) {
            Some(connection_id) => self.send_to_connection(connection_id, message),
            None => false,
        }
    }

    /// 向大厅成员发送消息（可排除发送者），返回成功投递数
    pub fn notify_lobby(&self, members: &[String], except: Option<&str>, message: &MessageDto) -> usize {
        let mut delivered = 0;
        for member in members.iter().filter(|m| Some(m.as_str()) != except) {
            if self.send_to_player(member, message.clone()) {
                delivered += 1;
            } else {
                warn!(
                    "Dropping {:?} for player {}: no open connection",
                    message.message_type, member
                );
            }
        }
        delivered
    }

    /// 发送给所有连接（可排除一个）
    pub fn broadcast(&self, message: &MessageDto, except: Option<ConnectionId>) -> usize {
        let mut delivered = 0;
        for entry in self.connections.iter() {
            if Some(*entry.key()) == except {
                continue;
            }
            if entry.value().send(message.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}
