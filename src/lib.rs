// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 消息 DTO 与共享的应用状态
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 棋盘、玩家、大厅等核心实体及其服务
pub mod domain;

/// 基础设施模块
///
/// WebSocket 连接中心
pub mod infrastructure;

/// 表示层模块
///
/// 处理 WebSocket 与 HTTP 请求，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 错误类型与日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现后台清理任务
pub mod workers;
