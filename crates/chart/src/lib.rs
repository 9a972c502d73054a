//! # `orbitdeck-chart` - 历史数据图表
//!
//! 将历史序列转换为折线图描述，并渲染为 SVG 图像。
//! 渲染是同步的纯计算，不依赖任何绘图后端。

pub mod series;
pub mod svg;
