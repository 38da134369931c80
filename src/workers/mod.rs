// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 后台周期任务：清理过期大厅和断开连接的玩家
pub mod cleanup_worker;
pub mod worker;

pub use cleanup_worker::CleanupWorker;
pub use worker::Worker;
