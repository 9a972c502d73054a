use crate::feed::entity::{
    CompanyOverview, DailyBar, EarthConditions, NewsQuery, RawQuote, SolReport,
};
use crate::feed::error::FetchError;
use crate::observation::entity::Article;
use async_trait::async_trait;
use std::sync::Arc;

/// # Summary
/// 外部数据源句柄。
///
/// # Invariants
/// - `Err` 表示数据源在启动时即不可用 (未配置凭据或客户端初始化失败)，
///   Provider 必须直接走降级路径而不发起任何外部调用。
pub type FeedHandle<F> = Result<Arc<F>, FetchError>;

/// # Summary
/// 地球城市天气数据源。
#[async_trait]
pub trait EarthWeatherFeed: Send + Sync {
    /// # Summary
    /// 获取指定城市的当前天气。
    ///
    /// # Arguments
    /// * `city`: 城市名。
    ///
    /// # Returns
    /// 成功返回当前天气，失败返回 `FetchError`。
    async fn current(&self, city: &str) -> Result<EarthConditions, FetchError>;
}

/// # Summary
/// 火星天气数据源。
#[async_trait]
pub trait MarsWeatherFeed: Send + Sync {
    /// # Summary
    /// 获取最近上报的火星日数据。
    ///
    /// # Returns
    /// 按火星日编号升序排列的非空列表；没有任何火星日数据时返回 `FetchError::Empty`。
    async fn latest_sols(&self) -> Result<Vec<SolReport>, FetchError>;
}

/// # Summary
/// 股票行情数据源。
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// 获取实时报价
    async fn quote(&self, symbol: &str) -> Result<RawQuote, FetchError>;

    /// 获取公司概况
    async fn overview(&self, symbol: &str) -> Result<CompanyOverview, FetchError>;

    /// # Summary
    /// 获取日线序列。
    ///
    /// # Returns
    /// 按日期升序排列的日线列表。
    async fn daily_series(&self, symbol: &str) -> Result<Vec<DailyBar>, FetchError>;
}

/// # Summary
/// 新闻检索数据源。
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// # Summary
    /// 执行一次新闻检索。
    ///
    /// # Arguments
    /// * `query`: 检索参数。
    ///
    /// # Returns
    /// 按相关性排列的新闻列表，可能为空。
    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>, FetchError>;
}
