// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::errors::GameError;

/// 应用错误类型
///
/// REST 接口的统一错误出口：领域中的“未找到”映射为 404，
/// 其他领域错误为 400，其余错误为 500。
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = match self.0.downcast_ref::<GameError>() {
            Some(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Some(_) => StatusCode::BAD_REQUEST,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::from(GameError::LobbyNotFound("abc123".into())).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad_request = AppError::from(GameError::EmptyLobbyId).into_response();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let internal = AppError::from(anyhow::anyhow!("socket closed")).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
