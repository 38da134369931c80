// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::player_color::PlayerColor;
use crate::domain::models::rules::GameRules;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、对局规则和后台清理三部分
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 对局规则配置
    pub game: GameSettings,
    /// 清理工作器配置
    pub cleanup: CleanupSettings,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 对局规则配置设置
#[derive(Debug, Deserialize)]
pub struct GameSettings {
    /// 获胜所需胜利点数
    pub win_threshold: u32,
    /// 大厅人数上限，不超过可分配颜色数
    pub max_players: usize,
    pub max_cheats_per_player: u32,
    pub max_reports_per_player: u32,
}

/// 清理工作器配置设置
#[derive(Debug, Deserialize)]
pub struct CleanupSettings {
    /// 运行间隔（秒）
    pub interval_secs: u64,
    /// 大厅存活时间（秒）
    pub lobby_max_age_secs: u64,
}

impl CleanupSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn lobby_max_age(&self) -> Duration {
        Duration::from_secs(self.lobby_max_age_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `CATANIA__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("game.win_threshold", 10)?
            .set_default("game.max_players", 6)?
            .set_default("game.max_cheats_per_player", 2)?
            .set_default("game.max_reports_per_player", 2)?
            .set_default("cleanup.interval_secs", 24 * 60 * 60)?
            .set_default("cleanup.lobby_max_age_secs", 2 * 24 * 60 * 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CATANIA").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 服务层使用的规则对象，人数上限按颜色数截断
    pub fn game_rules(&self) -> GameRules {
        GameRules {
            win_threshold: self.game.win_threshold,
            max_players: self.game.max_players.min(PlayerColor::assignable().len()),
            max_cheats_per_player: self.game.max_cheats_per_player,
            max_reports_per_player: self.game.max_reports_per_player,
        }
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
