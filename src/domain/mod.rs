// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 棋盘（board）：六边形地块、建筑点、道路、港口与棋盘生成
/// - 领域模型（models）：玩家、大厅、资源、交易等实体
/// - 服务（services）：玩家、大厅、对局和交易的内存服务
///
/// 领域层不依赖表示层或基础设施层。
pub mod board;
pub mod models;
pub mod services;
