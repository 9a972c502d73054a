use crate::warnings::{Warning, WarningSet};
use chrono::{DateTime, Utc};
use orbitdeck_core::common::Planet;
use orbitdeck_core::common::time::TimeProvider;
use orbitdeck_core::layout::{CardId, CardLayout};
use orbitdeck_core::observation::entity::{
    Headlines, HistoricalSeries, Observed, PriceBar, ProviderResult, StockQuote, WeatherDay,
    WeatherReading,
};
use orbitdeck_core::observation::error::ProviderError;
use orbitdeck_core::observation::port::{NewsProvider, StockProvider, WeatherProvider};
use serde::Serialize;
use std::sync::Arc;

/// 历史查询的默认天数
pub const DEFAULT_HISTORY_DAYS: usize = 7;
/// 历史查询允许的最大天数
pub const MAX_HISTORY_DAYS: usize = 30;

/// # Summary
/// 规范化历史查询天数：缺省为 7，限制在 `[1, 30]`。
pub fn clamp_days(days: Option<usize>) -> usize {
    days.unwrap_or(DEFAULT_HISTORY_DAYS)
        .clamp(1, MAX_HISTORY_DAYS)
}

/// # Summary
/// 一次仪表盘加载的完整快照。
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub weather: ProviderResult<WeatherReading>,
    pub stocks: ProviderResult<StockQuote>,
    pub news: Observed<Headlines>,
    // 每个触发额度告警的提供者一条
    pub warnings: Vec<Warning>,
    // 当前会话的卡片顺序
    pub layout: CardLayout,
    pub generated_at: DateTime<Utc>,
}

/// # Summary
/// 仪表盘服务，组合天气、股票、新闻三个提供者。
///
/// # Invariants
/// - 无内部可变状态，布局由调用方按会话传入。
pub struct DashboardService {
    weather: Arc<dyn WeatherProvider>,
    stocks: Arc<dyn StockProvider>,
    news: Arc<dyn NewsProvider>,
    clock: Arc<dyn TimeProvider>,
}

impl DashboardService {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        stocks: Arc<dyn StockProvider>,
        news: Arc<dyn NewsProvider>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            weather,
            stocks,
            news,
            clock,
        }
    }

    /// # Summary
    /// 生成仪表盘快照。
    ///
    /// # Logic
    /// 1. 依次获取天气、股票、新闻 (顺序执行，不并发)。
    /// 2. 汇总额度告警，每个提供者至多一条。
    /// 3. 附带调用方传入的会话布局。
    ///
    /// # Arguments
    /// * `layout`: 当前会话的卡片顺序。
    ///
    /// # Returns
    /// 结构完整的快照；提供者失败以降级数据体现，不会返回错误。
    pub async fn snapshot(&self, layout: CardLayout) -> DashboardSnapshot {
        let weather = self.weather.fetch_current().await;
        let stocks = self.stocks.fetch_current().await;
        let news = self.news.fetch_current().await;

        let mut warnings = WarningSet::new();
        warnings.inspect(CardId::Weather, weather.iter().map(|(_, v)| v));
        warnings.inspect(CardId::Stocks, stocks.iter().map(|(_, v)| v));
        warnings.inspect(CardId::News, [&news]);
        let warnings = warnings.into_vec();

        tracing::info!(
            weather = weather.len(),
            stocks = stocks.len(),
            articles = news.record.articles.len(),
            warnings = warnings.len(),
            "Dashboard snapshot assembled"
        );

        DashboardSnapshot {
            weather,
            stocks,
            news,
            warnings,
            layout,
            generated_at: self.clock.now(),
        }
    }

    pub async fn weather(&self) -> ProviderResult<WeatherReading> {
        self.weather.fetch_current().await
    }

    pub async fn stocks(&self) -> ProviderResult<StockQuote> {
        self.stocks.fetch_current().await
    }

    pub async fn news(&self) -> Observed<Headlines> {
        self.news.fetch_current().await
    }

    /// # Summary
    /// 获取行星温度历史。
    ///
    /// # Arguments
    /// * `planet`: 行星名 (大小写不敏感)。
    /// * `days`: 回溯天数，缺省 7，限制在 `[1, 30]`。
    ///
    /// # Returns
    /// 未知行星返回 `ProviderError::UnknownSubject`。
    pub async fn weather_history(
        &self,
        planet: &str,
        days: Option<usize>,
    ) -> Result<Observed<HistoricalSeries<WeatherDay>>, ProviderError> {
        let planet = planet
            .parse::<Planet>()
            .map_err(|_| ProviderError::UnknownSubject(planet.to_string()))?;
        Ok(self.weather.fetch_historical(planet, clamp_days(days)).await)
    }

    /// # Summary
    /// 获取股票日线历史。
    pub async fn stock_history(
        &self,
        ticker: &str,
        days: Option<usize>,
    ) -> Result<Observed<HistoricalSeries<PriceBar>>, ProviderError> {
        self.stocks.fetch_historical(ticker, clamp_days(days)).await
    }

    pub async fn news_history(&self, query: &str, days: Option<usize>) -> Observed<Headlines> {
        self.news.fetch_historical(query, clamp_days(days)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_days() {
        assert_eq!(clamp_days(None), 7);
        assert_eq!(clamp_days(Some(0)), 1);
        assert_eq!(clamp_days(Some(14)), 14);
        assert_eq!(clamp_days(Some(365)), 30);
    }
}
