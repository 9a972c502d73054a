use axum::Json;
use axum::extract::{Path, Query, State};
use orbitdeck_core::observation::entity::{
    Headlines, HistoricalSeries, Observed, PriceBar, WeatherDay,
};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, HistoryQuery, NewsHistoryQuery};

/// 获取行星温度历史
#[utoipa::path(
    get,
    path = "/api/history/weather/{planet}",
    tag = "历史 (History)",
    params(
        ("planet" = String, Path, description = "行星名 (earth / mars)"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "按日期升序排列的温度序列"),
        (status = 404, description = "未知行星", body = ApiErrorResponse)
    )
)]
pub async fn weather_history(
    State(state): State<AppState>,
    Path(planet): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Observed<HistoricalSeries<WeatherDay>>>, ApiError> {
    let series = state.dashboard.weather_history(&planet, query.days).await?;
    Ok(Json(series))
}

/// 获取股票日线历史
#[utoipa::path(
    get,
    path = "/api/history/stocks/{ticker}",
    tag = "历史 (History)",
    params(
        ("ticker" = String, Path, description = "股票代码 (大小写不敏感)"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "按日期升序排列的日线序列"),
        (status = 404, description = "不在关注列表中的股票", body = ApiErrorResponse)
    )
)]
pub async fn stock_history(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Observed<HistoricalSeries<PriceBar>>>, ApiError> {
    let series = state.dashboard.stock_history(&ticker, query.days).await?;
    Ok(Json(series))
}

/// 按关键字检索过去若干天的新闻
#[utoipa::path(
    get,
    path = "/api/history/news",
    tag = "历史 (History)",
    params(NewsHistoryQuery),
    responses(
        (status = 200, description = "至多 5 篇新闻；失败时为 3 篇兜底新闻")
    )
)]
pub async fn news_history(
    State(state): State<AppState>,
    Query(query): Query<NewsHistoryQuery>,
) -> Json<Observed<Headlines>> {
    let q = query.q.unwrap_or_default();
    Json(state.dashboard.news_history(&q, query.days).await)
}
