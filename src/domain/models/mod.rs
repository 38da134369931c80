// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了游戏的核心实体，包括：
/// - 资源与地块类型（resource）
/// - 玩家及其颜色（player、player_color）
/// - 建筑与建造成本（building）
/// - 骰子、发展卡（dice、development_card）
/// - 大厅与回合状态（lobby）
/// - 交易请求（trade）与对局规则（rules）
pub mod building;
pub mod development_card;
pub mod dice;
pub mod lobby;
pub mod player;
pub mod player_color;
pub mod resource;
pub mod rules;
pub mod trade;
