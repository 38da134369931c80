// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 连接中心（connection_hub）持有每个 WebSocket 连接的出站通道，
/// 负责单播、大厅通知和全局广播。
pub mod connection_hub;
