use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use orbitdeck_core::common::Planet;
use orbitdeck_core::common::random::{FixedRandom, SeededRandom};
use orbitdeck_core::common::time::FakeClockProvider;
use orbitdeck_core::feed::entity::{
    CompanyOverview, DailyBar, EarthConditions, NewsQuery, RawQuote, SolReport,
};
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::{
    EarthWeatherFeed, FeedHandle, MarketFeed, MarsWeatherFeed, NewsFeed,
};
use orbitdeck_core::observation::entity::{Article, ArticleSource, Degradation, Origin};
use orbitdeck_core::observation::error::ProviderError;
use orbitdeck_core::observation::port::{NewsProvider, StockProvider, WeatherProvider};
use orbitdeck_provider::news::NewsService;
use orbitdeck_provider::stocks::{StockService, WATCHLIST};
use orbitdeck_provider::weather::WeatherService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn clock() -> Arc<FakeClockProvider> {
    Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
    ))
}

fn missing(var: &str) -> FetchError {
    FetchError::MissingCredentials(var.to_string())
}

// ---- 天气 ----

struct FailingEarth(FetchError);

#[async_trait]
impl EarthWeatherFeed for FailingEarth {
    async fn current(&self, _city: &str) -> Result<EarthConditions, FetchError> {
        Err(self.0.clone())
    }
}

struct FixedEarth;

#[async_trait]
impl EarthWeatherFeed for FixedEarth {
    async fn current(&self, city: &str) -> Result<EarthConditions, FetchError> {
        Ok(EarthConditions {
            city: city.to_string(),
            temperature_c: 9.96,
            condition: "Rain".to_string(),
            humidity: 81.0,
            wind_speed_kmh: 9.0,
            pressure_hpa: Some(1012.0),
            observed_at: Utc.with_ymd_and_hms(2024, 3, 10, 11, 50, 0).unwrap(),
        })
    }
}

struct FailingMars(FetchError);

#[async_trait]
impl MarsWeatherFeed for FailingMars {
    async fn latest_sols(&self) -> Result<Vec<SolReport>, FetchError> {
        Err(self.0.clone())
    }
}

struct FixedMars(Vec<SolReport>);

#[async_trait]
impl MarsWeatherFeed for FixedMars {
    async fn latest_sols(&self) -> Result<Vec<SolReport>, FetchError> {
        Ok(self.0.clone())
    }
}

fn sol(sol: u32, wind: f64) -> SolReport {
    SolReport {
        sol,
        temp_avg_f: -60.0,
        temp_min_f: -96.0,
        temp_max_f: -15.0,
        pressure_pa: Some(720.0),
        wind_speed_kmh: Some(wind),
        last_utc: None,
    }
}

fn weather_service(
    earth: FeedHandle<dyn EarthWeatherFeed>,
    mars: FeedHandle<dyn MarsWeatherFeed>,
) -> WeatherService {
    WeatherService::new(earth, mars, "London", clock(), Arc::new(SeededRandom::new(11)))
}

/// # Summary
/// 凭据缺失、网络错误、非成功状态码三种情况下当前天气结果结构完整。
#[tokio::test]
async fn test_weather_current_is_complete_under_failures() {
    let failures = [
        missing("OPENWEATHER_API_KEY"),
        FetchError::Network("connection refused".to_string()),
        FetchError::Status(503),
    ];

    for failure in failures {
        let service = match &failure {
            FetchError::MissingCredentials(_) => weather_service(
                Err(failure.clone()),
                Ok(Arc::new(FailingMars(failure.clone()))),
            ),
            other => weather_service(
                Ok(Arc::new(FailingEarth(other.clone()))),
                Ok(Arc::new(FailingMars(other.clone()))),
            ),
        };
        let result = service.fetch_current().await;

        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["earth", "mars"]);
        let earth = result.get("earth").unwrap();
        assert_eq!(earth.record.temperature, 20.0);
        assert_eq!(earth.record.condition, "Sunny");
        assert_eq!(earth.origin, Origin::Fallback(failure.degradation()));
        assert!(earth.note.is_some());

        let mars = result.get("mars").unwrap();
        assert_eq!(mars.record.temperature, -63.0);
        assert_eq!(mars.record.wind_speed, 30.0);
        assert!(mars.note.is_some());
    }
}

#[tokio::test]
async fn test_weather_current_live() {
    let service = weather_service(
        Ok(Arc::new(FixedEarth)),
        Ok(Arc::new(FixedMars(vec![sol(674, 10.0), sol(675, 30.0)]))),
    );
    let result = service.fetch_current().await;

    let earth = result.get("earth").unwrap();
    assert!(earth.is_live());
    assert_eq!(earth.record.condition, "Rain");

    let mars = result.get("mars").unwrap();
    assert!(mars.is_live());
    assert_eq!(mars.record.sol, Some(675));
    assert_eq!(mars.record.temperature, -49.4);
    assert_eq!(mars.record.condition, "Dusty");
    // 未上报采样时间时使用当前时间
    assert_eq!(mars.record.timestamp, Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap());
}

/// # Summary
/// 火星接口不可达时，7 天历史全部为 [-80, -40] 区间内的模拟数据。
#[tokio::test]
async fn test_mars_history_unreachable_is_simulated() {
    let service = weather_service(
        Err(missing("OPENWEATHER_API_KEY")),
        Ok(Arc::new(FailingMars(FetchError::Network("unreachable".to_string())))),
    );
    let history = service.fetch_historical(Planet::Mars, 7).await;

    assert_eq!(history.origin, Origin::Simulated(Degradation::Upstream));
    assert_eq!(history.record.points.len(), 7);
    assert!(
        history
            .record
            .points
            .iter()
            .all(|p| (-80.0..=-40.0).contains(&p.temperature))
    );
    let dates: Vec<NaiveDate> = history.record.points.iter().map(|p| p.date).collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(dates.last().copied(), NaiveDate::from_ymd_opt(2024, 3, 10));
}

#[tokio::test]
async fn test_mars_history_maps_recent_sols() {
    let sols = (670..=676).map(|n| sol(n, 12.0)).collect();
    let service = weather_service(
        Err(missing("OPENWEATHER_API_KEY")),
        Ok(Arc::new(FixedMars(sols))),
    );
    let history = service.fetch_historical(Planet::Mars, 3).await;

    assert!(history.is_live());
    let points = &history.record.points;
    assert_eq!(
        points.iter().map(|p| p.sol).collect::<Vec<_>>(),
        vec![Some(674), Some(675), Some(676)]
    );
    assert_eq!(points[2].date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
}

#[tokio::test]
async fn test_earth_history_is_always_simulated() {
    let service = weather_service(Ok(Arc::new(FixedEarth)), Err(missing("NASA_API_KEY")));
    let history = service.fetch_historical(Planet::Earth, 5).await;

    assert_eq!(history.origin, Origin::Simulated(Degradation::NotSupported));
    assert_eq!(history.record.points.len(), 5);
    assert!(
        history
            .record
            .points
            .iter()
            .all(|p| (15.0..=25.0).contains(&p.temperature))
    );
}

// ---- 股票 ----

/// 按代码返回预设结果的行情数据源，同时记录调用次数
struct ScriptedMarket {
    failing: Vec<(&'static str, FetchError)>,
    calls: AtomicUsize,
    daily: Mutex<Vec<DailyBar>>,
}

impl ScriptedMarket {
    fn new(failing: Vec<(&'static str, FetchError)>) -> Self {
        Self {
            failing,
            calls: AtomicUsize::new(0),
            daily: Mutex::new(Vec::new()),
        }
    }

    fn failure(&self, symbol: &str) -> Option<FetchError> {
        self.failing
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, e)| e.clone())
    }
}

#[async_trait]
impl MarketFeed for ScriptedMarket {
    async fn quote(&self, symbol: &str) -> Result<RawQuote, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure(symbol) {
            return Err(err);
        }
        Ok(RawQuote {
            symbol: symbol.to_string(),
            price: "100.1234".to_string(),
            volume: "12345".to_string(),
            change_percent: "1.5000%".to_string(),
        })
    }

    async fn overview(&self, symbol: &str) -> Result<CompanyOverview, FetchError> {
        Ok(CompanyOverview {
            symbol: symbol.to_string(),
            name: format!("{symbol} Corp"),
        })
    }

    async fn daily_series(&self, _symbol: &str) -> Result<Vec<DailyBar>, FetchError> {
        let bars = self.daily.lock().unwrap().clone();
        if bars.is_empty() {
            return Err(FetchError::RateLimited(
                "Our standard API call frequency is 5 calls per minute".to_string(),
            ));
        }
        Ok(bars)
    }
}

fn stock_service(feed: FeedHandle<dyn MarketFeed>) -> StockService {
    StockService::new(feed, Duration::ZERO, clock(), Arc::new(SeededRandom::new(5)))
}

/// # Summary
/// 单只股票失败只影响自身。
#[tokio::test]
async fn test_one_failing_ticker_keeps_siblings_live() {
    let market = Arc::new(ScriptedMarket::new(vec![(
        "SPCE",
        FetchError::RateLimited("call frequency".to_string()),
    )]));
    let result = stock_service(Ok(market.clone())).fetch_current().await;

    assert_eq!(
        result.keys().collect::<Vec<_>>(),
        vec!["SPCE", "BA", "LMT", "NOC", "RTX"]
    );
    let spce = result.get("SPCE").unwrap();
    assert_eq!(spce.origin, Origin::Fallback(Degradation::RateLimited));
    assert_eq!(spce.record.current_price, 1.50);
    assert_eq!(spce.record.change, -2.5);
    assert!(spce.note.as_deref().unwrap().contains("API limit"));

    for ticker in ["BA", "LMT", "NOC", "RTX"] {
        let quote = result.get(ticker).unwrap();
        assert!(quote.is_live(), "{ticker} should be live");
        assert_eq!(quote.record.current_price, 100.12);
        assert_eq!(quote.record.change, 1.5);
        assert_eq!(quote.record.name, format!("{ticker} Corp"));
    }
    assert_eq!(market.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_missing_credentials_simulates_every_ticker() {
    let result = stock_service(Err(missing("ALPHA_VANTAGE_API_KEY")))
        .fetch_current()
        .await;

    assert_eq!(result.len(), WATCHLIST.len());
    for (_, quote) in result.iter() {
        assert_eq!(quote.origin, Origin::Simulated(Degradation::MissingCredentials));
        assert!(quote.note.is_some());
    }
}

#[tokio::test]
async fn test_spce_with_zero_drift() {
    let service = StockService::new(
        Err(missing("ALPHA_VANTAGE_API_KEY")),
        Duration::ZERO,
        clock(),
        Arc::new(FixedRandom::new(0.0)),
    );
    let result = service.fetch_current().await;
    let spce = result.get("SPCE").unwrap();
    assert_eq!(spce.record.current_price, 1.50);
    assert_eq!(spce.record.change, 0.0);
    assert_eq!(spce.record.volume, 1_000_000);
}

/// # Summary
/// 1000 个随机种子下模拟价格与成交量都在基准值的漂移范围内。
#[tokio::test]
async fn test_simulated_drift_bounds() {
    for seed in 0..1000 {
        let service = StockService::new(
            Err(missing("ALPHA_VANTAGE_API_KEY")),
            Duration::ZERO,
            clock(),
            Arc::new(SeededRandom::new(seed)),
        );
        let result = service.fetch_current().await;
        for base in &WATCHLIST {
            let quote = &result.get(base.ticker).unwrap().record;
            // 基准价的 2% 在分位上是整数，按分比较避免浮点误差
            let base_cents = (base.price * 100.0).round() as i64;
            let cents = (quote.current_price * 100.0).round() as i64;
            assert!(cents >= base_cents * 98 / 100, "{} below -2%", base.ticker);
            assert!(cents <= base_cents * 102 / 100, "{} above +2%", base.ticker);
            assert!(quote.change.abs() <= 2.0);
            assert!(quote.volume >= base.volume * 9 / 10);
            assert!(quote.volume <= base.volume * 11 / 10);
        }
    }
}

#[tokio::test]
async fn test_pacing_sleeps_between_tickers() {
    tokio::time::pause();
    let market = Arc::new(ScriptedMarket::new(Vec::new()));
    let service = StockService::new(
        Ok(market),
        Duration::from_millis(200),
        clock(),
        Arc::new(SeededRandom::new(1)),
    );
    let started = tokio::time::Instant::now();
    let result = service.fetch_current().await;
    assert_eq!(result.len(), 5);
    // 五只股票之间共四次间隔
    assert!(started.elapsed() >= Duration::from_millis(800));
}

#[tokio::test]
async fn test_stock_history_truncates_live_series() -> Result<()> {
    let market = Arc::new(ScriptedMarket::new(Vec::new()));
    {
        let mut daily = market.daily.lock().unwrap();
        for day in 1..=10 {
            daily.push(DailyBar {
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.5,
                volume: 1000,
            });
        }
    }
    let history = stock_service(Ok(market)).fetch_historical("ba", 4).await?;

    assert!(history.is_live());
    assert_eq!(history.record.subject, "BA");
    assert_eq!(history.record.label, "Boeing");
    let days: Vec<u32> = history
        .record
        .points
        .iter()
        .map(|p| chrono::Datelike::day(&p.date))
        .collect();
    assert_eq!(days, vec![7, 8, 9, 10]);
    Ok(())
}

#[tokio::test]
async fn test_stock_history_falls_back_to_random_walk() -> Result<()> {
    let market = Arc::new(ScriptedMarket::new(Vec::new()));
    let history = stock_service(Ok(market)).fetch_historical("LMT", 30).await?;

    assert_eq!(history.origin, Origin::Simulated(Degradation::RateLimited));
    assert_eq!(history.record.points.len(), 30);
    assert!(history.note.as_deref().unwrap().contains("API limit"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_ticker_is_rejected() {
    let result = stock_service(Err(missing("ALPHA_VANTAGE_API_KEY")))
        .fetch_historical("TSLA", 7)
        .await;
    assert!(matches!(result, Err(ProviderError::UnknownSubject(t)) if t == "TSLA"));
}

// ---- 新闻 ----

struct ScriptedNews {
    outcome: Result<Vec<Article>, FetchError>,
    last_query: Mutex<Option<NewsQuery>>,
}

impl ScriptedNews {
    fn new(outcome: Result<Vec<Article>, FetchError>) -> Self {
        Self {
            outcome,
            last_query: Mutex::new(None),
        }
    }
}

#[async_trait]
impl NewsFeed for ScriptedNews {
    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>, FetchError> {
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.outcome.clone()
    }
}

fn news_feed(feed: ScriptedNews) -> FeedHandle<dyn NewsFeed> {
    Ok(Arc::new(feed))
}

fn headlines(count: usize) -> Vec<Article> {
    (0..count)
        .map(|i| Article {
            title: format!("Launch report #{i}"),
            description: None,
            url: format!("https://news.example/{i}"),
            source: ArticleSource {
                id: None,
                name: "Orbit Times".to_string(),
            },
            published_at: Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap(),
        })
        .collect()
}

#[tokio::test]
async fn test_news_live_results_truncated_to_five() {
    let feed = Arc::new(ScriptedNews::new(Ok(headlines(9))));
    let service = NewsService::new(Ok(feed.clone()), 20, clock());
    let news = service.fetch_current().await;

    assert!(news.is_live());
    assert_eq!(news.record.articles.len(), 5);

    let query = feed.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.query, "space exploration OR NASA OR SpaceX OR Blue Origin");
    assert_eq!(query.from, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    assert_eq!(query.language, "en");
    assert_eq!(query.sort_by, "relevancy");
}

#[tokio::test]
async fn test_news_fallback_has_three_articles() {
    let cases: Vec<(FeedHandle<dyn NewsFeed>, Degradation)> = vec![
        (Err(missing("NEWS_API_KEY")), Degradation::MissingCredentials),
        (news_feed(ScriptedNews::new(Ok(Vec::new()))), Degradation::NoData),
        (
            news_feed(ScriptedNews::new(Err(FetchError::RateLimited(
                "rateLimited".to_string(),
            )))),
            Degradation::RateLimited,
        ),
        (
            news_feed(ScriptedNews::new(Err(FetchError::Status(500)))),
            Degradation::Upstream,
        ),
    ];

    for (feed, reason) in cases {
        let news = NewsService::new(feed, 20, clock()).fetch_current().await;
        assert_eq!(news.origin, Origin::Fallback(reason));
        assert_eq!(news.record.articles.len(), 3);
        assert!(news.note.is_some());
    }
}

#[tokio::test]
async fn test_news_history_uses_caller_query() {
    let feed = Arc::new(ScriptedNews::new(Ok(headlines(2))));
    let service = NewsService::new(Ok(feed.clone()), 20, clock());
    let news = service.fetch_historical("Artemis", 7).await;

    assert_eq!(news.record.articles.len(), 2);
    let query = feed.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.query, "Artemis");
    assert_eq!(query.from, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
}
