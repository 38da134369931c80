// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求处理器模块
///
/// `game_socket` 管理 WebSocket 连接，`message_handler` 分发游戏消息，
/// `lobby_handler` 提供大厅查询的 REST 接口。
pub mod game_socket;
pub mod lobby_handler;
pub mod message_handler;
