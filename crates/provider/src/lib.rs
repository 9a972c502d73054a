//! # `orbitdeck-provider` - 数据提供者
//!
//! 实现核心层的 `WeatherProvider` / `StockProvider` / `NewsProvider` 契约。
//!
//! 所有外部调用都只尝试一次，失败在 Provider 边界被折叠为静态兜底数据或随机模拟数据，
//! 调用方永远拿到结构完整的结果，降级原因通过 `Origin` 标签与 `note` 文本体现。

pub mod news;
pub mod simulate;
pub mod stocks;
pub mod weather;
