use crate::http::{build_client, decode, read_text, require_key, send};
use async_trait::async_trait;
use chrono::NaiveDate;
use orbitdeck_core::feed::entity::{CompanyOverview, DailyBar, RawQuote};
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::MarketFeed;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// 凭据对应的环境变量名
pub const ALPHA_VANTAGE_KEY_VAR: &str = "ALPHA_VANTAGE_API_KEY";
const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";

/// # Summary
/// Alpha Vantage 行情客户端。
///
/// # Invariants
/// - 构造成功即意味着凭据存在。
/// - Alpha Vantage 在额度耗尽时仍返回 HTTP 200，必须检查响应体中的提示字段。
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
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
        let api_key = require_key(api_key, ALPHA_VANTAGE_KEY_VAR)?;
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
        })
    }

    /// 覆盖服务地址 (测试中指向本地模拟服务)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// # Summary
    /// 调用 `/query` 接口并返回原始响应体。
    ///
    /// # Arguments
    /// * `function`: Alpha Vantage 函数名，例如 `GLOBAL_QUOTE`。
    /// * `symbol`: 股票代码。
    async fn query(&self, function: &str, symbol: &str) -> Result<String, FetchError> {
        let url = format!("{}/query", self.base_url);
        tracing::debug!(function, symbol, "requesting Alpha Vantage");

        let resp = send(self.client.get(&url).query(&[
            ("function", function),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ]))
        .await?;
        read_text(resp).await
    }
}

/// Alpha Vantage 在响应体中携带的提示信息
#[derive(Deserialize, Debug, Default)]
struct Advisory {
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

impl Advisory {
    /// # Summary
    /// 检查提示信息。
    ///
    /// # Logic
    /// 1. 提示中出现 "limit" / "frequency" 视为额度耗尽。
    /// 2. 其余提示或错误信息视为被上游拒绝。
    fn check(&self) -> Result<(), FetchError> {
        if let Some(msg) = self.note.as_ref().or(self.information.as_ref()) {
            let lower = msg.to_lowercase();
            if lower.contains("limit") || lower.contains("frequency") {
                return Err(FetchError::RateLimited(msg.clone()));
            }
            return Err(FetchError::Rejected(msg.clone()));
        }
        if let Some(msg) = &self.error_message {
            return Err(FetchError::Rejected(msg.clone()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug)]
struct QuoteEnvelope {
    #[serde(flatten)]
    advisory: Advisory,
    #[serde(rename = "Global Quote")]
    quote: Option<GlobalQuote>,
}

#[derive(Deserialize, Debug)]
struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: Option<String>,
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "06. volume")]
    volume: Option<String>,
    #[serde(rename = "10. change percent")]
    change_percent: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OverviewEnvelope {
    #[serde(flatten)]
    advisory: Advisory,
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct DailyEnvelope {
    #[serde(flatten)]
    advisory: Advisory,
    // 键为 YYYY-MM-DD，BTreeMap 保证日期升序
    #[serde(rename = "Time Series (Daily)")]
    series: Option<BTreeMap<String, RawDailyBar>>,
}

#[derive(Deserialize, Debug)]
struct RawDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

fn missing(field: &str) -> FetchError {
    FetchError::Parse(format!("Missing field {}", field))
}

fn number<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T, FetchError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| FetchError::Parse(format!("Invalid {}: {}", field, raw)))
}

/// # Summary
/// 解析 `GLOBAL_QUOTE` 响应。
///
/// # Returns
/// 空的 `Global Quote` 对象 (未知代码) 返回 `FetchError::Empty`。
pub fn parse_quote(body: &str) -> Result<RawQuote, FetchError> {
    let envelope: QuoteEnvelope = decode(body)?;
    envelope.advisory.check()?;

    let quote = envelope.quote.ok_or(FetchError::Empty)?;
    let symbol = quote.symbol.ok_or(FetchError::Empty)?;
    Ok(RawQuote {
        symbol,
        price: quote.price.ok_or_else(|| missing("05. price"))?,
        volume: quote.volume.ok_or_else(|| missing("06. volume"))?,
        change_percent: quote
            .change_percent
            .ok_or_else(|| missing("10. change percent"))?,
    })
}

/// # Summary
/// 解析 `OVERVIEW` 响应。
pub fn parse_overview(body: &str) -> Result<CompanyOverview, FetchError> {
    let envelope: OverviewEnvelope = decode(body)?;
    envelope.advisory.check()?;

    match (envelope.symbol, envelope.name) {
        (Some(symbol), Some(name)) => Ok(CompanyOverview { symbol, name }),
        _ => Err(FetchError::Empty),
    }
}

/// # Summary
/// 解析 `TIME_SERIES_DAILY` 响应。
///
/// # Logic
/// 1. 检查提示信息。
/// 2. 逐日解析 OHLCV，任意字段非法即整体失败。
///
/// # Returns
/// 按日期升序排列的非空日线列表。
pub fn parse_daily(body: &str) -> Result<Vec<DailyBar>, FetchError> {
    let envelope: DailyEnvelope = decode(body)?;
    envelope.advisory.check()?;

    let series = envelope.series.ok_or(FetchError::Empty)?;
    if series.is_empty() {
        return Err(FetchError::Empty);
    }

    series
        .iter()
        .map(|(date, bar)| {
            Ok(DailyBar {
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| FetchError::Parse(format!("Invalid date {}: {}", date, e)))?,
                open: number(&bar.open, "open")?,
                high: number(&bar.high, "high")?,
                low: number(&bar.low, "low")?,
                close: number(&bar.close, "close")?,
                volume: number(&bar.volume, "volume")?,
            })
        })
        .collect()
}

#[async_trait]
impl MarketFeed for AlphaVantageClient {
    async fn quote(&self, symbol: &str) -> Result<RawQuote, FetchError> {
        parse_quote(&self.query("GLOBAL_QUOTE", symbol).await?)
    }

    async fn overview(&self, symbol: &str) -> Result<CompanyOverview, FetchError> {
        parse_overview(&self.query("OVERVIEW", symbol).await?)
    }

    async fn daily_series(&self, symbol: &str) -> Result<Vec<DailyBar>, FetchError> {
        parse_daily(&self.query("TIME_SERIES_DAILY", symbol).await?)
    }
}
