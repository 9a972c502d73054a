use crate::simulate::{drift_quote, random_walk, trailing_dates};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orbitdeck_core::common::random::RandomSource;
use orbitdeck_core::common::round_to;
use orbitdeck_core::common::time::TimeProvider;
use orbitdeck_core::feed::entity::{CompanyOverview, DailyBar, RawQuote};
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::{FeedHandle, MarketFeed};
use orbitdeck_core::observation::entity::{
    Degradation, HistoricalSeries, Observed, PriceBar, ProviderResult, StockQuote,
};
use orbitdeck_core::observation::error::ProviderError;
use orbitdeck_core::observation::port::StockProvider;
use std::sync::Arc;
use std::time::Duration;

/// # Summary
/// 关注股票的静态兜底行情，同时作为模拟数据的基准。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackQuote {
    pub ticker: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub change: f64,
    pub volume: u64,
}

/// 关注列表，顺序即输出顺序
pub const WATCHLIST: [FallbackQuote; 5] = [
    FallbackQuote {
        ticker: "SPCE",
        name: "Virgin Galactic",
        price: 1.50,
        change: -2.5,
        volume: 1_000_000,
    },
    FallbackQuote {
        ticker: "BA",
        name: "Boeing",
        price: 180.00,
        change: 1.2,
        volume: 5_000_000,
    },
    FallbackQuote {
        ticker: "LMT",
        name: "Lockheed Martin",
        price: 450.00,
        change: 0.8,
        volume: 2_000_000,
    },
    FallbackQuote {
        ticker: "NOC",
        name: "Northrop Grumman",
        price: 420.00,
        change: -0.5,
        volume: 1_500_000,
    },
    FallbackQuote {
        ticker: "RTX",
        name: "Raytheon Technologies",
        price: 90.00,
        change: 1.5,
        volume: 3_000_000,
    },
];

/// 按代码查找关注股票 (大小写不敏感)
pub fn fallback_quote(ticker: &str) -> Option<&'static FallbackQuote> {
    WATCHLIST
        .iter()
        .find(|q| q.ticker.eq_ignore_ascii_case(ticker))
}

impl FallbackQuote {
    fn quote(&self, now: DateTime<Utc>) -> StockQuote {
        StockQuote {
            name: self.name.to_string(),
            current_price: self.price,
            change: self.change,
            volume: self.volume,
            timestamp: now,
        }
    }

    fn simulated_quote(&self, now: DateTime<Utc>, random: &dyn RandomSource) -> StockQuote {
        let (current_price, change, volume) = drift_quote(self.price, self.volume, random);
        StockQuote {
            name: self.name.to_string(),
            current_price,
            change,
            volume,
            timestamp: now,
        }
    }
}

/// # Summary
/// 解析 "1.2000%" 形式的涨跌幅。
pub fn parse_change_percent(raw: &str) -> Result<f64, FetchError> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    trimmed
        .parse::<f64>()
        .map_err(|e| FetchError::Parse(format!("change percent '{raw}': {e}")))
}

/// # Summary
/// 将上游的原始字符串报价转换为行情快照。
///
/// # Logic
/// 1. 价格与涨跌幅保留两位小数。
/// 2. 任一字段无法解析即视为响应格式异常。
pub fn quote_from_raw(
    raw: &RawQuote,
    overview: &CompanyOverview,
    now: DateTime<Utc>,
) -> Result<StockQuote, FetchError> {
    let price = raw
        .price
        .trim()
        .parse::<f64>()
        .map_err(|e| FetchError::Parse(format!("price '{}': {e}", raw.price)))?;
    let volume = raw
        .volume
        .trim()
        .parse::<u64>()
        .map_err(|e| FetchError::Parse(format!("volume '{}': {e}", raw.volume)))?;

    Ok(StockQuote {
        name: overview.name.clone(),
        current_price: round_to(price, 2),
        change: round_to(parse_change_percent(&raw.change_percent)?, 2),
        volume,
        timestamp: now,
    })
}

fn price_bar(bar: DailyBar) -> PriceBar {
    PriceBar {
        date: bar.date,
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
    }
}

/// # Summary
/// 航天板块股票行情提供者。
///
/// # Invariants
/// - 每只股票独立获取，失败只替换该股票自身的数据。
/// - 相邻两只股票的请求之间固定间隔 `pacing`，不做重试。
pub struct StockService {
    feed: FeedHandle<dyn MarketFeed>,
    pacing: Duration,
    clock: Arc<dyn TimeProvider>,
    random: Arc<dyn RandomSource>,
}

impl StockService {
    /// # Summary
    /// 创建股票行情提供者。
    ///
    /// # Arguments
    /// * `feed`: 行情数据源句柄。
    /// * `pacing`: 相邻股票请求之间的间隔。
    /// * `clock`: 时钟。
    /// * `random`: 模拟数据使用的随机源。
    pub fn new(
        feed: FeedHandle<dyn MarketFeed>,
        pacing: Duration,
        clock: Arc<dyn TimeProvider>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            feed,
            pacing,
            clock,
            random,
        }
    }

    async fn live_quote(
        feed: &dyn MarketFeed,
        ticker: &str,
        now: DateTime<Utc>,
    ) -> Result<StockQuote, FetchError> {
        let raw = feed.quote(ticker).await?;
        let overview = feed.overview(ticker).await?;
        quote_from_raw(&raw, &overview, now)
    }

    fn simulate_all(&self, reason: Degradation) -> ProviderResult<StockQuote> {
        let now = self.clock.now();
        let mut result = ProviderResult::new();
        for base in &WATCHLIST {
            result.insert(
                base.ticker,
                Observed::simulated(base.simulated_quote(now, self.random.as_ref()), reason),
            );
        }
        result
    }

    async fn daily_bars(&self, ticker: &str, days: usize) -> Result<Vec<PriceBar>, FetchError> {
        let feed = self.feed.as_ref().map_err(Clone::clone)?;
        let mut bars = feed.daily_series(ticker).await?;
        if bars.is_empty() {
            return Err(FetchError::Empty);
        }
        let recent = bars.split_off(bars.len().saturating_sub(days));
        Ok(recent.into_iter().map(price_bar).collect())
    }
}

#[async_trait]
impl StockProvider for StockService {
    /// # Summary
    /// 获取关注列表中所有股票的当前行情。
    ///
    /// # Logic
    /// 1. 数据源不可用 (未配置凭据等)：全部股票生成模拟数据，不发起任何调用。
    /// 2. 否则逐只股票依次请求报价与公司概况，两只之间等待 `pacing`。
    /// 3. 单只股票失败时替换为该股票的静态兜底行情。
    async fn fetch_current(&self) -> ProviderResult<StockQuote> {
        let feed = match &self.feed {
            Ok(feed) => feed,
            Err(err) => {
                tracing::warn!(error = %err, "Market feed unavailable, simulating all tickers");
                return self.simulate_all(err.degradation());
            }
        };

        let mut result = ProviderResult::new();
        for (index, base) in WATCHLIST.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }

            let now = self.clock.now();
            let observed = match Self::live_quote(feed.as_ref(), base.ticker, now).await {
                Ok(quote) => Observed::live(quote),
                Err(err) => {
                    tracing::warn!(ticker = base.ticker, error = %err, "Quote unavailable, serving fallback");
                    Observed::fallback(base.quote(now), err.degradation())
                }
            };
            result.insert(base.ticker, observed);
        }
        result
    }

    /// # Summary
    /// 获取单只股票的日线历史。
    ///
    /// # Logic
    /// 1. 代码不在关注列表中直接返回 `UnknownSubject`。
    /// 2. 请求日线并截取最近 `days` 天。
    /// 3. 任何失败都以兜底价格为起点生成随机游走序列。
    async fn fetch_historical(
        &self,
        ticker: &str,
        days: usize,
    ) -> Result<Observed<HistoricalSeries<PriceBar>>, ProviderError> {
        let base = fallback_quote(ticker)
            .ok_or_else(|| ProviderError::UnknownSubject(ticker.to_string()))?;
        let days = days.max(1);

        let series = |points| HistoricalSeries {
            subject: base.ticker.to_string(),
            label: base.name.to_string(),
            points,
        };

        match self.daily_bars(base.ticker, days).await {
            Ok(points) => Ok(Observed::live(series(points))),
            Err(err) => {
                tracing::warn!(ticker = base.ticker, error = %err, "Daily series unavailable, serving simulated walk");
                let dates = trailing_dates(self.clock.now().date_naive(), days);
                let points = random_walk(base.price, base.volume, &dates, self.random.as_ref());
                Ok(Observed::simulated(series(points), err.degradation()))
            }
        }
    }
}
