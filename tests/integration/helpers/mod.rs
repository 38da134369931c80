// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::{TestServer, TestWebSocket};
use catania_united::application::state::AppState;
use catania_united::presentation::routes;
use serde_json::{json, Value};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// 使用内存传输的测试服务，适合 REST 接口
pub fn create_test_app() -> TestApp {
    let state = AppState::default();
    let server = TestServer::new(routes::app(state.clone())).unwrap();
    TestApp { server, state }
}

/// WebSocket 需要真实的 HTTP 传输
pub fn create_ws_test_app() -> TestApp {
    let state = AppState::default();
    let server = TestServer::builder()
        .http_transport()
        .build(routes::app(state.clone()))
        .unwrap();
    TestApp { server, state }
}

/// 已连接的客户端及其服务端分配的玩家 id
pub struct Client {
    pub ws: TestWebSocket,
    pub player_id: String,
}

impl Client {
    pub async fn connect(server: &TestServer) -> Self {
        let mut ws = server.get_websocket("/game").await.into_websocket().await;
        let hello: Value = ws.receive_json().await;
        assert_eq!(hello["type"], "CONNECTION_SUCCESSFUL");
        let player_id = hello["message"]["playerId"]
            .as_str()
            .unwrap()
            .to_string();
        Self { ws, player_id }
    }

    pub async fn send(&mut self, message_type: &str, lobby_id: Option<&str>, message: Value) {
        let mut frame = json!({ "type": message_type, "message": message });
        if let Some(lobby_id) = lobby_id {
            frame["lobbyId"] = json!(lobby_id);
        }
        self.ws.send_json(&frame).await;
    }

    pub async fn receive(&mut self) -> Value {
        self.ws.receive_json().await
    }

    /// 跳过其他消息，直到收到指定类型
    pub async fn receive_type(&mut self, message_type: &str) -> Value {
        loop {
            let message = self.receive().await;
            if message["type"] == message_type {
                return message;
            }
        }
    }
}
