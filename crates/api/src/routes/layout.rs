use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use orbitdeck_core::layout::CardLayout;

use crate::middleware::session::CurrentLayout;
use crate::session::{clear_layout_cookie, layout_cookie};
use crate::types::{ApiResponse, LayoutRequest, LayoutResponse};

/// 获取当前会话的卡片顺序
#[utoipa::path(
    get,
    path = "/api/layout",
    tag = "布局 (Layout)",
    responses(
        (status = 200, description = "当前卡片顺序", body = ApiResponse<LayoutResponse>)
    )
)]
pub async fn get_layout(CurrentLayout(layout): CurrentLayout) -> Json<ApiResponse<LayoutResponse>> {
    Json(ApiResponse::ok(LayoutResponse::new(&layout, false)))
}

/// 重排卡片
///
/// 新顺序必须是三张卡片的完整排列。无法解析的请求体与不合法的顺序都被静默忽略，
/// 返回原顺序且不写 Cookie。
#[utoipa::path(
    post,
    path = "/api/layout",
    tag = "布局 (Layout)",
    request_body = LayoutRequest,
    responses(
        (status = 200, description = "生效后的卡片顺序，updated 表示是否被采纳", body = ApiResponse<LayoutResponse>)
    )
)]
pub async fn update_layout(
    CurrentLayout(current): CurrentLayout,
    payload: Result<Json<LayoutRequest>, JsonRejection>,
) -> Response {
    let accepted = match &payload {
        Ok(Json(req)) => CardLayout::from_names(req.order.as_slice()),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Ignored unreadable layout request");
            None
        }
    };

    match accepted {
        Some(layout) => {
            tracing::info!(order = ?layout.cards(), "Card layout updated");
            (
                [(SET_COOKIE, layout_cookie(&layout))],
                Json(ApiResponse::ok(LayoutResponse::new(&layout, true))),
            )
                .into_response()
        }
        None => {
            if let Ok(Json(req)) = &payload {
                tracing::debug!(order = ?req.order, "Ignored invalid card order");
            }
            Json(ApiResponse::ok(LayoutResponse::new(&current, false))).into_response()
        }
    }
}

/// 恢复默认卡片顺序
#[utoipa::path(
    get,
    path = "/api/layout/reset",
    tag = "布局 (Layout)",
    responses(
        (status = 200, description = "默认卡片顺序", body = ApiResponse<LayoutResponse>)
    )
)]
pub async fn reset_layout() -> Response {
    let layout = CardLayout::default();
    (
        [(SET_COOKIE, clear_layout_cookie())],
        Json(ApiResponse::ok(LayoutResponse::new(&layout, true))),
    )
        .into_response()
}
