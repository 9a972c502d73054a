//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。
//! 数据提供者的外部调用失败不会出现在这里，只有历史与图表接口会返回错误。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orbitdeck_core::chart::error::ChartError;
use orbitdeck_core::observation::error::ProviderError;
use thiserror::Error;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 资源未找到 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 没有可用数据 (500)，错误信息原样返回给客户端
    #[error("{0}")]
    NoData(String),

    /// 下层内部错误 (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::NoData(msg) => {
                tracing::warn!("Request produced no data: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::Internal(msg) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ApiErrorResponse::from_msg(message));
        (status, body).into_response()
    }
}

/// 从 `ProviderError` 转换
impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::UnknownSubject(subject) => {
                ApiError::NotFound(format!("Unknown subject: {}", subject))
            }
        }
    }
}

/// 从 `ChartError` 转换
impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match &err {
            ChartError::EmptySeries(_) => ApiError::NoData(err.to_string()),
            ChartError::Render(_) => ApiError::Internal(err.to_string()),
        }
    }
}
