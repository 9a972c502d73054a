use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use orbitdeck_chart::series::{stock_chart_spec, weather_chart_spec};
use orbitdeck_core::chart::entity::{ChartSpec, RenderedChart};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, HistoryQuery};

fn image_response(chart: RenderedChart) -> Response {
    ([(CONTENT_TYPE, chart.content_type)], chart.bytes).into_response()
}

fn render(state: &AppState, spec: &ChartSpec) -> Result<Response, ApiError> {
    let chart = state.charts.render(spec)?;
    Ok(image_response(chart))
}

/// 渲染行星温度历史折线图
#[utoipa::path(
    get,
    path = "/api/chart/weather/{planet}",
    tag = "图表 (Chart)",
    params(
        ("planet" = String, Path, description = "行星名 (earth / mars)"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "SVG 图像", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "未知行星", body = ApiErrorResponse),
        (status = 500, description = "没有可绘制的历史数据", body = ApiErrorResponse)
    )
)]
pub async fn weather_chart(
    State(state): State<AppState>,
    Path(planet): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let series = state.dashboard.weather_history(&planet, query.days).await?;
    render(&state, &weather_chart_spec(&series.record))
}

/// 渲染股票收盘价历史折线图
#[utoipa::path(
    get,
    path = "/api/chart/stocks/{ticker}",
    tag = "图表 (Chart)",
    params(
        ("ticker" = String, Path, description = "股票代码 (大小写不敏感)"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "SVG 图像", body = String, content_type = "image/svg+xml"),
        (status = 404, description = "不在关注列表中的股票", body = ApiErrorResponse),
        (status = 500, description = "没有可绘制的历史数据", body = ApiErrorResponse)
    )
)]
pub async fn stock_chart(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let series = state.dashboard.stock_history(&ticker, query.days).await?;
    render(&state, &stock_chart_spec(&series.record))
}
