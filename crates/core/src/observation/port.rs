use crate::common::Planet;
use crate::observation::entity::{
    Headlines, HistoricalSeries, Observed, PriceBar, ProviderResult, StockQuote, WeatherDay,
    WeatherReading,
};
use crate::observation::error::ProviderError;
use async_trait::async_trait;

/// # Summary
/// 天气数据提供者契约。
///
/// # Invariants
/// - 两个方法都必须返回结构完整的结果，外部调用失败时以兜底或模拟数据代替。
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// # Summary
    /// 获取地球与火星的当前天气。
    ///
    /// # Returns
    /// 恰好包含 `earth` 与 `mars` 两个主体键的结果集。
    async fn fetch_current(&self) -> ProviderResult<WeatherReading>;

    /// # Summary
    /// 获取某个行星最近若干天的温度历史。
    ///
    /// # Arguments
    /// * `planet`: 目标行星。
    /// * `days`: 回溯天数。
    ///
    /// # Returns
    /// 按日期升序排列的历史序列。
    async fn fetch_historical(
        &self,
        planet: Planet,
        days: usize,
    ) -> Observed<HistoricalSeries<WeatherDay>>;
}

/// # Summary
/// 股票行情提供者契约。
///
/// # Invariants
/// - 单只股票的失败不得影响其他股票。
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// # Summary
    /// 获取全部关注股票的当前行情。
    ///
    /// # Returns
    /// 以股票代码为键、按关注列表顺序排列的结果集。
    async fn fetch_current(&self) -> ProviderResult<StockQuote>;

    /// # Summary
    /// 获取单只股票最近若干天的日线。
    ///
    /// # Arguments
    /// * `ticker`: 股票代码 (大小写不敏感)。
    /// * `days`: 回溯天数。
    ///
    /// # Returns
    /// 成功返回升序日线序列；代码不在关注列表中时返回 `ProviderError::UnknownSubject`。
    async fn fetch_historical(
        &self,
        ticker: &str,
        days: usize,
    ) -> Result<Observed<HistoricalSeries<PriceBar>>, ProviderError>;
}

/// # Summary
/// 航天新闻提供者契约。
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// # Summary
    /// 获取过去 24 小时内最相关的新闻。
    ///
    /// # Returns
    /// 至多 5 篇新闻；失败时为 3 篇固定兜底新闻。
    async fn fetch_current(&self) -> Observed<Headlines>;

    /// # Summary
    /// 按关键字检索过去若干天的新闻。
    ///
    /// # Arguments
    /// * `query`: 检索表达式。
    /// * `days`: 回溯天数。
    async fn fetch_historical(&self, query: &str, days: usize) -> Observed<Headlines>;
}
