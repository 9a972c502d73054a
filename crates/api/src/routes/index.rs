use axum::extract::State;
use axum::response::Html;
use orbitdeck_chart::series::{to_data_uri, weather_chart_spec};
use orbitdeck_core::common::Planet;
use orbitdeck_core::layout::{CardId, CardLayout};

use crate::middleware::session::CurrentLayout;
use crate::server::AppState;

fn card_title(card: CardId) -> &'static str {
    match card {
        CardId::Weather => "Planetary Weather",
        CardId::Stocks => "Aerospace Stocks",
        CardId::News => "Space News",
    }
}

// 页面加载后按卡片 id 拉取对应接口并原样展示 JSON
const LOADER_SCRIPT: &str = r#"<script>
document.querySelectorAll("section[data-card]").forEach(function (card) {
  fetch("/api/" + card.dataset.card)
    .then(function (res) { return res.json(); })
    .then(function (data) { card.querySelector("pre").textContent = JSON.stringify(data, null, 2); })
    .catch(function (err) { card.querySelector("pre").textContent = String(err); });
});
</script>"#;

/// # Summary
/// 按会话卡片顺序生成页面。
///
/// # Arguments
/// * `layout`: 卡片顺序。
/// * `mars_chart`: 嵌入天气卡片的火星温度图 (data URI)，渲染失败时为 None。
pub fn render_page(layout: &CardLayout, mars_chart: Option<&str>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>OrbitDeck</title></head>\n<body>\n<h1>OrbitDeck</h1>\n",
    );
    for card in layout.cards() {
        let chart = match (card, mars_chart) {
            (CardId::Weather, Some(uri)) => {
                format!("<img alt=\"Mars Temperature History\" src=\"{uri}\">")
            }
            _ => String::new(),
        };
        html.push_str(&format!(
            "<section id=\"{card}-card\" data-card=\"{card}\"><h2>{}</h2>{chart}<pre>Loading...</pre></section>\n",
            card_title(*card)
        ));
    }
    html.push_str(LOADER_SCRIPT);
    html.push_str("\n</body>\n</html>\n");
    html
}

// 火星最近 7 天温度图，任何一步失败都只是不显示图片
async fn mars_chart(state: &AppState) -> Option<String> {
    let series = match state.dashboard.weather_history(Planet::Mars.key(), None).await {
        Ok(series) => series,
        Err(e) => {
            tracing::debug!("Mars history unavailable for index page: {}", e);
            return None;
        }
    };
    match state.charts.render(&weather_chart_spec(&series.record)) {
        Ok(chart) => Some(to_data_uri(&chart)),
        Err(e) => {
            tracing::debug!("Mars chart not rendered for index page: {}", e);
            None
        }
    }
}

/// 仪表盘首页
#[utoipa::path(
    get,
    path = "/",
    tag = "仪表盘 (Dashboard)",
    responses(
        (status = 200, description = "按会话卡片顺序排列的 HTML 页面，天气卡片内嵌火星温度图", body = String, content_type = "text/html")
    )
)]
pub async fn index(
    State(state): State<AppState>,
    CurrentLayout(layout): CurrentLayout,
) -> Html<String> {
    let chart = mars_chart(&state).await;
    Html(render_page(&layout, chart.as_deref()))
}
