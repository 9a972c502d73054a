use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use orbitdeck_api::server::{AppState, build_router};
use orbitdeck_api::types::ApiErrorResponse;
use orbitdeck_chart::svg::SvgChartRenderer;
use orbitdeck_core::common::Planet;
use orbitdeck_core::common::random::{FixedRandom, RandomSource};
use orbitdeck_core::common::time::{FakeClockProvider, TimeProvider};
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::{EarthWeatherFeed, FeedHandle, MarketFeed, MarsWeatherFeed, NewsFeed};
use orbitdeck_core::observation::entity::{
    Degradation, HistoricalSeries, Observed, ProviderResult, WeatherDay, WeatherReading,
};
use orbitdeck_core::observation::port::{NewsProvider, StockProvider, WeatherProvider};
use orbitdeck_dashboard::service::DashboardService;
use orbitdeck_provider::news::NewsService;
use orbitdeck_provider::stocks::StockService;
use orbitdeck_provider::weather::WeatherService;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use serde_json::{Value, json};
use tokio::net::TcpListener;

fn missing<F: ?Sized>(var: &str) -> FeedHandle<F> {
    Err(FetchError::MissingCredentials(var.to_string()))
}

fn clock() -> Arc<dyn TimeProvider> {
    Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
    ))
}

fn random() -> Arc<dyn RandomSource> {
    Arc::new(FixedRandom::new(0.5))
}

fn stock_provider() -> Arc<dyn StockProvider> {
    let feed: FeedHandle<dyn MarketFeed> = missing("ALPHA_VANTAGE_API_KEY");
    Arc::new(StockService::new(feed, Duration::ZERO, clock(), random()))
}

fn news_provider() -> Arc<dyn NewsProvider> {
    let feed: FeedHandle<dyn NewsFeed> = missing("NEWS_API_KEY");
    Arc::new(NewsService::new(feed, 20, clock()))
}

// 所有数据源都没有凭据，服务完全离线运行在降级模式
fn offline_state() -> AppState {
    let earth: FeedHandle<dyn EarthWeatherFeed> = missing("OPENWEATHER_API_KEY");
    let mars: FeedHandle<dyn MarsWeatherFeed> = missing("NASA_API_KEY");
    let weather = Arc::new(WeatherService::new(earth, mars, "London", clock(), random()));
    let dashboard = DashboardService::new(weather, stock_provider(), news_provider(), clock());
    AppState::new(Arc::new(dashboard), Arc::new(SvgChartRenderer::default()))
}

// 历史序列为空的天气提供者，用于覆盖无数据可绘制的情况
struct EmptyHistoryWeather;

#[async_trait]
impl WeatherProvider for EmptyHistoryWeather {
    async fn fetch_current(&self) -> ProviderResult<WeatherReading> {
        ProviderResult::new()
    }

    async fn fetch_historical(
        &self,
        planet: Planet,
        _days: usize,
    ) -> Observed<HistoricalSeries<WeatherDay>> {
        Observed::simulated(
            HistoricalSeries {
                subject: planet.key().to_string(),
                label: planet.display_name().to_string(),
                points: Vec::new(),
            },
            Degradation::NoData,
        )
    }
}

async fn spawn_test_server(state: AppState) -> String {
    orbitdeck_feed::http::install_crypto_provider();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    let router = build_router(state);
    tokio::spawn(async move {
        axum_serve(listener, router).await;
    });
    addr
}

async fn axum_serve(listener: TcpListener, router: axum::Router) {
    if let Err(e) = axum::serve(listener, router).await {
        eprintln!("test server stopped: {e}");
    }
}

fn layout_cookie(res: &reqwest::Response) -> String {
    let header = res
        .headers()
        .get(SET_COOKIE)
        .expect("accepted layout must be written to the cookie")
        .to_str()
        .unwrap();
    assert!(header.contains("HttpOnly"));
    header.split(';').next().unwrap().to_string()
}

// 发送重排请求，返回 (新写入的 Cookie, 响应体)
async fn post_layout(request: reqwest::RequestBuilder) -> (Option<String>, Value) {
    let res = request.send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res.headers().get(SET_COOKIE).map(|_| layout_cookie(&res));
    (cookie, res.json().await.unwrap())
}

#[tokio::test]
async fn test_degraded_dashboard_workflow() {
    let base_url = spawn_test_server(offline_state()).await;
    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 当前天气，两颗行星都是兜底数据
    // ============================================
    let res = client.get(format!("{base_url}/api/weather")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    // 服务端不为读取请求写 Cookie
    assert!(res.headers().get(SET_COOKIE).is_none());
    let weather: Value = res.json().await.unwrap();
    let keys: Vec<&str> = weather.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["earth", "mars"]);
    assert_eq!(weather["earth"]["temperature"], json!(20.0));
    assert_eq!(weather["earth"]["condition"], "Sunny");
    assert_eq!(weather["mars"]["temperature"], json!(-63.0));
    assert_eq!(
        weather["earth"]["note"],
        "Using fallback data - API key not configured"
    );

    // ============================================
    // Case 2: 股票按关注列表顺序全部返回
    // ============================================
    let stocks: Value = client
        .get(format!("{base_url}/api/stocks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tickers: Vec<&str> = stocks.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(tickers, ["SPCE", "BA", "LMT", "NOC", "RTX"]);
    assert_eq!(stocks["BA"]["origin"]["kind"], "simulated");

    // ============================================
    // Case 3: 新闻兜底为 3 篇
    // ============================================
    let news: Value = client
        .get(format!("{base_url}/api/news"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(news["articles"].as_array().unwrap().len(), 3);
    assert_eq!(news["origin"]["kind"], "fallback");

    // ============================================
    // Case 4: 完整快照带默认布局
    // ============================================
    let snapshot: Value = client
        .get(format!("{base_url}/api/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["layout"], json!(["weather", "stocks", "news"]));
    assert!(snapshot["weather"]["mars"].is_object());
    assert_eq!(snapshot["stocks"].as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn test_history_and_charts() {
    let base_url = spawn_test_server(offline_state()).await;
    let client = reqwest::Client::new();

    // 缺省 7 天
    let mars: Value = client
        .get(format!("{base_url}/api/history/weather/mars"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let points = mars["points"].as_array().unwrap();
    assert_eq!(points.len(), 7);
    assert_eq!(points[6]["date"], "2024-03-10");
    for point in points {
        let t = point["temperature"].as_f64().unwrap();
        assert!((-80.0..=-40.0).contains(&t));
    }

    // 超出上限时截到 30 天
    let stock: Value = client
        .get(format!("{base_url}/api/history/stocks/lmt?days=365"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stock["subject"], "LMT");
    assert_eq!(stock["points"].as_array().unwrap().len(), 30);

    // 未知主体
    let res = client
        .get(format!("{base_url}/api/history/weather/venus"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert!(!body.success);

    let res = client
        .get(format!("{base_url}/api/chart/stocks/TSLA"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // 新闻检索使用调用方关键字，降级时仍有兜底
    let news: Value = client
        .get(format!("{base_url}/api/history/news?q=Artemis&days=3"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(news["articles"].as_array().unwrap().len(), 3);

    // 图表
    let res = client
        .get(format!("{base_url}/api/chart/weather/earth?days=10"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "image/svg+xml");
    let svg = res.text().await.unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Earth Temperature History"));

    let res = client
        .get(format!("{base_url}/api/chart/stocks/SPCE"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_history_chart_is_server_error() {
    let dashboard = DashboardService::new(
        Arc::new(EmptyHistoryWeather),
        stock_provider(),
        news_provider(),
        clock(),
    );
    let state = AppState::new(Arc::new(dashboard), Arc::new(SvgChartRenderer::default()));
    let base_url = spawn_test_server(state).await;

    let res = reqwest::get(format!("{base_url}/api/chart/weather/mars"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ApiErrorResponse = res.json().await.unwrap();
    assert!(!body.success);
    assert!(!body.error.is_empty());
}

#[tokio::test]
async fn test_layout_is_kept_per_session() {
    let base_url = spawn_test_server(offline_state()).await;
    let client = reqwest::Client::new();
    let layout_url = format!("{base_url}/api/layout");

    let body: Value = client.get(&layout_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["data"]["order"], json!(["weather", "stocks", "news"]));

    // 不完整的排列被忽略，不写 Cookie
    let (cookie, body) = post_layout(
        client.post(&layout_url).json(&json!({ "order": ["stocks", "weather"] })),
    )
    .await;
    assert!(cookie.is_none());
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["updated"], false);
    assert_eq!(body["data"]["order"], json!(["weather", "stocks", "news"]));

    // 完整排列生效并写入 Cookie
    let (cookie, body) = post_layout(
        client
            .post(&layout_url)
            .json(&json!({ "order": ["news", "weather", "stocks"] })),
    )
    .await;
    let cookie = cookie.expect("accepted order sets the layout cookie");
    assert_eq!(cookie, "orbitdeck_layout=news.weather.stocks");
    assert_eq!(body["data"]["updated"], true);

    // 无法解析的请求体同样被忽略，返回 Cookie 中的当前顺序
    let current = json!(["news", "weather", "stocks"]);
    let unreadable = [
        client
            .post(&layout_url)
            .header(COOKIE, &cookie)
            .json(&json!({ "order": "weather" })),
        client
            .post(&layout_url)
            .header(COOKIE, &cookie)
            .json(&json!({ "order": ["weather", 1, "news"] })),
        client
            .post(&layout_url)
            .header(COOKIE, &cookie)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("order=news"),
        client
            .post(&layout_url)
            .header(COOKIE, &cookie)
            .header(CONTENT_TYPE, "application/json")
            .body("{not json"),
    ];
    for request in unreadable {
        let (set_cookie, body) = post_layout(request).await;
        assert!(set_cookie.is_none());
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["updated"], false);
        assert_eq!(body["data"]["order"], current);
    }

    // 首页与快照按 Cookie 中的顺序排列卡片
    let page = client
        .get(format!("{base_url}/"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let news = page.find("news-card").unwrap();
    let stocks = page.find("stocks-card").unwrap();
    assert!(news < stocks);
    assert!(page.contains("src=\"data:image/svg+xml;base64,"));

    let snapshot: Value = client
        .get(format!("{base_url}/api/dashboard"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["layout"], current);

    // 篡改过的 Cookie 回到默认顺序
    let body: Value = client
        .get(&layout_url)
        .header(COOKIE, "orbitdeck_layout=news.news.news")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["order"], json!(["weather", "stocks", "news"]));

    // 重置会清除 Cookie
    let res = client
        .get(format!("{base_url}/api/layout/reset"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let cleared = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cleared.starts_with("orbitdeck_layout=;"));
    assert!(cleared.contains("Max-Age=0"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["order"], json!(["weather", "stocks", "news"]));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let base_url = spawn_test_server(offline_state()).await;
    let doc: Value = reqwest::get(format!("{base_url}/api-docs/openapi.json"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/weather"));
    assert!(paths.contains_key("/api/layout"));
    assert!(paths.contains_key("/api/chart/stocks/{ticker}"));
}
