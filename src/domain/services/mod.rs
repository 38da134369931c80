// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 服务持有内存中的注册表并编排领域对象完成一次操作：
/// - 玩家服务（player_service）：按玩家与连接索引在线玩家
/// - 大厅服务（lobby_service）：大厅的创建、加入与查询
/// - 游戏服务（game_service）：棋盘注册表与全部对局规则
/// - 交易服务（trading_service）：银行、港口与玩家之间的交易
pub mod game_service;
pub mod lobby_service;
pub mod player_service;
pub mod trading_service;
