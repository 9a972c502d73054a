//! # 依赖组装
//!
//! 数据源客户端 → 数据源句柄 → Provider → 仪表盘服务 → API 状态。
//! 客户端构建失败 (例如缺少凭据) 不会中止启动，对应 Provider 直接走降级路径。

use std::sync::Arc;
use std::time::Duration;

use orbitdeck_api::server::AppState;
use orbitdeck_chart::svg::SvgChartRenderer;
use orbitdeck_core::common::random::{RandomSource, ThreadRandom};
use orbitdeck_core::common::time::{RealTimeProvider, TimeProvider};
use orbitdeck_core::config::AppConfig;
use orbitdeck_core::feed::port::{
    EarthWeatherFeed, FeedHandle, MarketFeed, MarsWeatherFeed, NewsFeed,
};
use orbitdeck_dashboard::service::DashboardService;
use orbitdeck_feed::alphavantage::AlphaVantageClient;
use orbitdeck_feed::insight::InsightClient;
use orbitdeck_feed::newsapi::NewsApiClient;
use orbitdeck_feed::openweather::OpenWeatherClient;
use orbitdeck_provider::news::NewsService;
use orbitdeck_provider::stocks::StockService;
use orbitdeck_provider::weather::WeatherService;

fn report<F: ?Sized>(name: &str, handle: &FeedHandle<F>) {
    match handle {
        Ok(_) => tracing::info!(feed = name, "Feed client ready"),
        Err(e) => tracing::warn!(feed = name, error = %e, "Feed unavailable, serving degraded data"),
    }
}

/// # Summary
/// 按配置组装完整的应用状态。
///
/// # Logic
/// 1. 安装 TLS 加密后端并构建四个数据源客户端。
/// 2. 构建三个 Provider，共享真实时钟与线程随机源。
/// 3. 构建仪表盘服务与 SVG 图表渲染器。
pub fn build_state(config: &AppConfig) -> AppState {
    orbitdeck_feed::http::install_crypto_provider();

    let timeout = Duration::from_secs(config.providers.http_timeout_secs);
    let credentials = &config.credentials;

    let earth: FeedHandle<dyn EarthWeatherFeed> =
        OpenWeatherClient::new(credentials.openweather_api_key.clone(), timeout)
            .map(|c| Arc::new(c) as Arc<dyn EarthWeatherFeed>);
    let mars: FeedHandle<dyn MarsWeatherFeed> = InsightClient::new(credentials.nasa_key(), timeout)
        .map(|c| Arc::new(c) as Arc<dyn MarsWeatherFeed>);
    let market: FeedHandle<dyn MarketFeed> =
        AlphaVantageClient::new(credentials.alpha_vantage_api_key.clone(), timeout)
            .map(|c| Arc::new(c) as Arc<dyn MarketFeed>);
    let news_feed: FeedHandle<dyn NewsFeed> =
        NewsApiClient::new(credentials.news_api_key.clone(), timeout)
            .map(|c| Arc::new(c) as Arc<dyn NewsFeed>);

    report("openweather", &earth);
    report("insight", &mars);
    report("alphavantage", &market);
    report("newsapi", &news_feed);

    let clock: Arc<dyn TimeProvider> = Arc::new(RealTimeProvider);
    let random: Arc<dyn RandomSource> = Arc::new(ThreadRandom);

    let weather = WeatherService::new(
        earth,
        mars,
        config.providers.city.clone(),
        clock.clone(),
        random.clone(),
    );
    let stocks = StockService::new(
        market,
        Duration::from_millis(config.providers.stock_pacing_ms),
        clock.clone(),
        random,
    );
    let news = NewsService::new(news_feed, config.providers.news_page_size, clock.clone());

    let dashboard = DashboardService::new(
        Arc::new(weather),
        Arc::new(stocks),
        Arc::new(news),
        clock,
    );

    AppState::new(Arc::new(dashboard), Arc::new(SvgChartRenderer::default()))
}
