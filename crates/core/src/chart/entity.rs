use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// # Summary
/// 折线图上的一个数据点。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// # Summary
/// 折线图描述：标题、坐标轴标签与按日期升序排列的数据点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
}

/// # Summary
/// 渲染完成的图表。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    // HTTP Content-Type，例如 "image/svg+xml"
    pub content_type: &'static str,
    // 图像字节
    pub bytes: Vec<u8>,
}
