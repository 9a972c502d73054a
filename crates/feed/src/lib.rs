//! # `orbitdeck-feed` - 外部数据源适配层
//!
//! 为核心层定义的 Feed 端口提供基于 `reqwest` 的实现：
//! - `openweather`: OpenWeatherMap 城市当前天气
//! - `insight`: NASA InSight 火星天气
//! - `alphavantage`: Alpha Vantage 报价、公司概况与日线
//! - `newsapi`: NewsAPI 新闻检索
//!
//! 每个客户端只发起单次请求，不做重试；错误统一映射为 `FetchError`。

pub mod alphavantage;
pub mod http;
pub mod insight;
pub mod newsapi;
pub mod openweather;
