// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据传输对象模块
///
/// 定义 WebSocket 协议消息以及发送给客户端的玩家、大厅投影
pub mod message;

pub use message::{LobbyInfo, MessageDto, MessageType, PlayerInfo};
