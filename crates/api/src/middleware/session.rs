//! # 会话中间件
//!
//! 从 `orbitdeck_layout` Cookie 解析卡片顺序并注入 request extensions，
//! Cookie 缺失或被篡改时使用默认顺序。

use axum::extract::{FromRequestParts, Request};
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use orbitdeck_core::layout::CardLayout;

use crate::error::ApiError;
use crate::session::{LAYOUT_COOKIE, layout_from_cookie_header};

/// # Summary
/// 解析当前请求的卡片顺序。
///
/// # Logic
/// 1. 在所有 `Cookie` 头中查找合法的 `orbitdeck_layout`。
/// 2. 找不到时使用默认顺序；带了 Cookie 却不合法时记录一条 debug 日志。
pub async fn session_middleware(mut req: Request, next: Next) -> Response {
    let layout = requested_layout(&req);
    req.extensions_mut().insert(layout);
    next.run(req).await
}

fn requested_layout(req: &Request) -> CardLayout {
    let headers: Vec<&str> = req
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();

    match headers.iter().find_map(|h| layout_from_cookie_header(h)) {
        Some(layout) => layout,
        None => {
            if headers.iter().any(|h| h.contains(LAYOUT_COOKIE)) {
                tracing::debug!("Ignored malformed layout cookie");
            }
            CardLayout::default()
        }
    }
}

// 在提取器中获取当前会话卡片顺序的快捷方式
pub struct CurrentLayout(pub CardLayout);

impl<S> FromRequestParts<S> for CurrentLayout
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let layout = parts
            .extensions
            .get::<CardLayout>()
            .cloned()
            .ok_or_else(|| ApiError::Internal("Missing layout context".into()))?;
        Ok(CurrentLayout(layout))
    }
}
