use axum::Json;
use axum::extract::State;
use orbitdeck_core::observation::entity::{
    Headlines, Observed, ProviderResult, StockQuote, WeatherReading,
};
use orbitdeck_dashboard::service::DashboardSnapshot;

use crate::middleware::session::CurrentLayout;
use crate::server::AppState;

/// 获取地球与火星的当前天气
#[utoipa::path(
    get,
    path = "/api/weather",
    tag = "仪表盘 (Dashboard)",
    responses(
        (status = 200, description = "以行星为键的天气数据，降级数据附带 origin 与 note")
    )
)]
pub async fn get_weather(State(state): State<AppState>) -> Json<ProviderResult<WeatherReading>> {
    Json(state.dashboard.weather().await)
}

/// 获取航天板块股票的当前行情
#[utoipa::path(
    get,
    path = "/api/stocks",
    tag = "仪表盘 (Dashboard)",
    responses(
        (status = 200, description = "以股票代码为键的行情数据，顺序为 SPCE, BA, LMT, NOC, RTX")
    )
)]
pub async fn get_stocks(State(state): State<AppState>) -> Json<ProviderResult<StockQuote>> {
    Json(state.dashboard.stocks().await)
}

/// 获取过去 24 小时的航天新闻
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "仪表盘 (Dashboard)",
    responses(
        (status = 200, description = "至多 5 篇新闻；失败时为 3 篇兜底新闻")
    )
)]
pub async fn get_news(State(state): State<AppState>) -> Json<Observed<Headlines>> {
    Json(state.dashboard.news().await)
}

/// 获取完整的仪表盘快照
///
/// 依次获取天气、股票与新闻，附带额度告警与当前会话的卡片顺序。
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "仪表盘 (Dashboard)",
    responses(
        (status = 200, description = "仪表盘快照")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    CurrentLayout(layout): CurrentLayout,
) -> Json<DashboardSnapshot> {
    Json(state.dashboard.snapshot(layout).await)
}
