//! # `orbitdeck-api` - HTTP API 层
//!
//! OrbitDeck 航天仪表盘的 HTTP 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 通过 Cookie 读写浏览器会话的卡片顺序，服务端无会话状态
//! - 调用下层 `DashboardService` 获取天气、股票、新闻数据
//! - 调用 `ChartRenderer` 将历史序列渲染为 SVG 图表

pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod session;
pub mod types;
