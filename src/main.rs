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

use catania_united::application::state::AppState;
use catania_united::config::settings::Settings;
use catania_united::presentation::routes;
use catania_united::utils::telemetry;
use catania_united::workers::CleanupWorker;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting catania-united...");

    // 2. Load configuration
    let settings = Settings::new()?;
    let rules = settings.game_rules();
    info!("Configuration loaded: {:?}", rules);

    // 3. Shared services
    let state = AppState::new(rules);

    // 4. Start workers
    let cleanup = CleanupWorker::new(
        state.clone(),
        settings.cleanup.interval(),
        settings.cleanup.lobby_max_age(),
    )
    .start();

    // 5. Start HTTP server
    let app = routes::app(state);
    let addr = settings.server.address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.abort();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
