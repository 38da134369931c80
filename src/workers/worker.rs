// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;

/// 后台工作器
///
/// `run` 通常是一个不返回的周期循环，只有在无法继续时才返回错误。
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self) -> Result<(), WorkerError>;

    /// 日志中使用的名称
    fn name(&self) -> &str;
}
