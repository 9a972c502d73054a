use crate::http::{build_client, decode, read_json, require_key, send};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orbitdeck_core::common::round_to;
use orbitdeck_core::feed::entity::EarthConditions;
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::EarthWeatherFeed;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 凭据对应的环境变量名
pub const OPENWEATHER_KEY_VAR: &str = "OPENWEATHER_API_KEY";
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// # Summary
/// OpenWeatherMap 当前天气客户端。
///
/// # Invariants
/// - 构造成功即意味着凭据存在。
/// - 单位固定为公制 (`units=metric`)。
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    /// # Summary
    /// 创建客户端。
    ///
    /// # Arguments
    /// * `api_key`: 可选的 API Key。
    /// * `timeout`: 请求超时。
    ///
    /// # Returns
    /// 凭据缺失返回 `FetchError::MissingCredentials`，客户端构建失败返回 `FetchError::ClientInit`。
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, FetchError> {
        let api_key = require_key(api_key, OPENWEATHER_KEY_VAR)?;
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: OPENWEATHER_BASE_URL.to_string(),
        })
    }

    /// 覆盖服务地址 (测试中指向本地模拟服务)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// OpenWeatherMap `/data/2.5/weather` 响应
#[derive(Deserialize, Debug)]
struct OwmResponse {
    name: Option<String>,
    weather: Vec<OwmCondition>,
    main: OwmMain,
    wind: Option<OwmWind>,
    dt: i64,
}

#[derive(Deserialize, Debug)]
struct OwmCondition {
    main: String,
}

#[derive(Deserialize, Debug)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: Option<f64>,
}

#[derive(Deserialize, Debug)]
struct OwmWind {
    // 米/秒
    speed: f64,
}

/// # Summary
/// 将上游响应转换为领域结构。
///
/// # Logic
/// 1. 取第一条天气分类作为状况标签，缺失时视为解析错误。
/// 2. 风速由 m/s 换算为 km/h，保留一位小数。
fn into_conditions(resp: OwmResponse, city: &str) -> Result<EarthConditions, FetchError> {
    let condition = resp
        .weather
        .first()
        .map(|w| w.main.clone())
        .ok_or_else(|| FetchError::Parse("No weather condition".into()))?;
    let observed_at = DateTime::<Utc>::from_timestamp(resp.dt, 0)
        .ok_or_else(|| FetchError::Parse(format!("Invalid timestamp {}", resp.dt)))?;

    Ok(EarthConditions {
        city: resp.name.unwrap_or_else(|| city.to_string()),
        temperature_c: round_to(resp.main.temp, 1),
        condition,
        humidity: resp.main.humidity,
        wind_speed_kmh: round_to(resp.wind.map(|w| w.speed).unwrap_or(0.0) * 3.6, 1),
        pressure_hpa: resp.main.pressure,
        observed_at,
    })
}

/// 从 JSON 文本解析当前天气
pub fn parse_current(body: &str, city: &str) -> Result<EarthConditions, FetchError> {
    into_conditions(decode(body)?, city)
}

#[async_trait]
impl EarthWeatherFeed for OpenWeatherClient {
    /// # Summary
    /// 查询城市当前天气。
    ///
    /// # Logic
    /// 1. 构建 `q`, `appid`, `units=metric` 查询参数。
    /// 2. 单次请求，非 2xx 直接返回错误。
    /// 3. 解析响应并换算单位。
    async fn current(&self, city: &str) -> Result<EarthConditions, FetchError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(city, "requesting OpenWeatherMap current weather");

        let resp = send(self.client.get(&url).query(&[
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ]))
        .await?;

        into_conditions(read_json(resp).await?, city)
    }
}
