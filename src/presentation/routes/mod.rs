// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::state::AppState;
use crate::presentation::handlers::{game_socket, lobby_handler};
use axum::{extract::Extension, routing::get, Router};
use tower_http::trace::TraceLayer;

/// 不依赖共享状态的基础路由
///
/// # 返回值
///
/// 返回健康检查与版本路由
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
}

/// 创建完整的应用路由
///
/// # 参数
///
/// * `state` - 应用共享状态，通过 `Extension` 注入
///
/// # 返回值
///
/// 返回配置好的路由
pub fn app(state: AppState) -> Router {
    let game_routes = Router::new()
        .route("/game", get(game_socket::game_socket))
        .route("/v1/lobbies", get(lobby_handler::list_lobbies))
        .route("/v1/lobbies/{id}", get(lobby_handler::get_lobby));

    Router::new()
        .merge(routes())
        .merge(game_routes)
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
