use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use orbitdeck_core::chart::entity::{ChartPoint, ChartSpec, RenderedChart};
use orbitdeck_core::observation::entity::{HistoricalSeries, PriceBar, WeatherDay};

/// # Summary
/// 温度历史折线图：横轴日期，纵轴摄氏温度。
pub fn weather_chart_spec(series: &HistoricalSeries<WeatherDay>) -> ChartSpec {
    ChartSpec {
        title: format!("{} Temperature History", series.label),
        x_label: "Date".to_string(),
        y_label: "Temperature (°C)".to_string(),
        points: series
            .points
            .iter()
            .map(|day| ChartPoint {
                date: day.date,
                value: day.temperature,
            })
            .collect(),
    }
}

/// # Summary
/// 股价历史折线图：使用收盘价。
pub fn stock_chart_spec(series: &HistoricalSeries<PriceBar>) -> ChartSpec {
    ChartSpec {
        title: format!("{} Stock Price History", series.label),
        x_label: "Date".to_string(),
        y_label: "Price ($)".to_string(),
        points: series
            .points
            .iter()
            .map(|bar| ChartPoint {
                date: bar.date,
                value: bar.close,
            })
            .collect(),
    }
}

/// # Summary
/// 将渲染结果编码为可直接嵌入 `<img src>` 的 data URI。
pub fn to_data_uri(chart: &RenderedChart) -> String {
    format!(
        "data:{};base64,{}",
        chart.content_type,
        STANDARD.encode(&chart.bytes)
    )
}
