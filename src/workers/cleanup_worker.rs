// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::state::AppState;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// 单次清理的结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub lobbies_removed: usize,
    pub boards_removed: usize,
    pub trades_removed: usize,
    pub players_removed: usize,
}

/// 累计统计
#[derive(Debug, Clone, Default)]
pub struct CleanupStats {
    pub runs: u64,
    pub lobbies_removed: u64,
    pub players_removed: u64,
    pub last_run: Option<DateTime<Utc>>,
}

/// 过期大厅清理工作器
///
/// 周期性删除超过存活时间的大厅（连同棋盘、交易请求和成员），
/// 并移除连接已经关闭的玩家。
pub struct CleanupWorker {
    state: AppState,
    interval: Duration,
    lobby_max_age: Duration,
    stats: Arc<RwLock<CleanupStats>>,
}

impl CleanupWorker {
    pub fn new(state: AppState, interval: Duration, lobby_max_age: Duration) -> Self {
        Self {
            state,
            interval,
            lobby_max_age,
            stats: Arc::new(RwLock::new(CleanupStats::default())),
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!("{} stopped: {}", self.name(), e);
            }
        })
    }

    /// 统计信息的共享句柄，启动后仍可读取
    pub fn stats_handle(&self) -> Arc<RwLock<CleanupStats>> {
        self.stats.clone()
    }

    pub fn stats(&self) -> CleanupStats {
        self.stats.read().clone()
    }

    /// 执行一次清理
    pub fn cleanup(&self) -> Result<CleanupReport, WorkerError> {
        let max_age = chrono::Duration::from_std(self.lobby_max_age)
            .map_err(|e| WorkerError::CleanupFailed(e.to_string()))?;
        let cutoff = Utc::now() - max_age;
        let mut report = CleanupReport::default();

        for lobby_id in self.state.lobbies.lobbies_older_than(cutoff) {
            if self.state.games.remove_board(&lobby_id) {
                report.boards_removed += 1;
            }
            report.trades_removed += self.state.trading.remove_trades_for_lobby(&lobby_id);
            if let Some(lobby) = self.state.lobbies.remove_lobby(&lobby_id) {
                for player_id in lobby.players() {
                    if self.state.players.remove_player(player_id).is_some() {
                        report.players_removed += 1;
                    }
                }
                report.lobbies_removed += 1;
                debug!("Removed stale lobby {}", lobby_id);
            }
        }

        let hub = self.state.hub.clone();
        report.players_removed += self
            .state
            .players
            .remove_disconnected(|connection_id| hub.is_open(connection_id));

        let mut stats = self.stats.write();
        stats.runs += 1;
        stats.lobbies_removed += report.lobbies_removed as u64;
        stats.players_removed += report.players_removed as u64;
        stats.last_run = Some(Utc::now());

        Ok(report)
    }
}

#[async_trait]
impl Worker for CleanupWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!(
            "{} started: interval={:?}, lobby_max_age={:?}",
            self.name(),
            self.interval,
            self.lobby_max_age
        );

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;

            match self.cleanup() {
                Ok(report) => {
                    if report != CleanupReport::default() {
                        info!(
                            "Cleanup removed {} lobbies and {} players",
                            report.lobbies_removed, report.players_removed
                        );
                    }
                }
                Err(e) => {
                    error!("Cleanup failed: {}", e);
                }
            }
        }
    }

    fn name(&self) -> &str {
        "cleanup_worker"
    }
}

#[cfg(test)]
#[path = "cleanup_worker_test.rs"]
mod tests;
