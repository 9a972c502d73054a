use crate::http::{build_client, decode, read_text, send};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orbitdeck_core::common::round_to;
use orbitdeck_core::feed::entity::SolReport;
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::MarsWeatherFeed;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// 凭据对应的环境变量名
pub const NASA_KEY_VAR: &str = "NASA_API_KEY";
const NASA_BASE_URL: &str = "https://api.nasa.gov";

/// # Summary
/// NASA InSight 火星天气客户端。
///
/// # Invariants
/// - 总是持有一个 API Key (缺省为公共演示密钥，由调用方传入)。
#[derive(Clone)]
pub struct InsightClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl InsightClient {
    /// # Summary
    /// 创建客户端。
    ///
    /// # Arguments
    /// * `api_key`: API Key，未配置时应传入 `DEMO_KEY`。
    /// * `timeout`: 请求超时。
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: NASA_BASE_URL.to_string(),
        })
    }

    /// 覆盖服务地址 (测试中指向本地模拟服务)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// InSight 响应顶层：`sol_keys` 列出有效火星日，其余键为各火星日数据
#[derive(Deserialize, Debug)]
struct InsightResponse {
    sol_keys: Vec<String>,
    #[serde(flatten)]
    sols: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct SolEntry {
    // 大气温度 (°F)
    #[serde(rename = "AT")]
    at: Option<Measure>,
    // 水平风速 (m/s)
    #[serde(rename = "HWS")]
    hws: Option<Measure>,
    // 气压 (Pa)
    #[serde(rename = "PRE")]
    pre: Option<Measure>,
    #[serde(rename = "Last_UTC")]
    last_utc: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
struct Measure {
    av: f64,
    mn: Option<f64>,
    mx: Option<f64>,
}

/// # Summary
/// 将单个火星日条目转换为领域结构。
///
/// # Logic
/// 1. 缺少温度平均/最低/最高任意一项的火星日无法计算温度，直接跳过。
/// 2. 风速由 m/s 换算为 km/h。
fn into_report(sol: u32, entry: SolEntry) -> Option<SolReport> {
    let at = entry.at?;
    Some(SolReport {
        sol,
        temp_avg_f: at.av,
        temp_min_f: at.mn?,
        temp_max_f: at.mx?,
        pressure_pa: entry.pre.map(|p| p.av),
        wind_speed_kmh: entry.hws.map(|w| round_to(w.av * 3.6, 1)),
        last_utc: entry.last_utc,
    })
}

/// # Summary
/// 从 JSON 文本解析火星日列表。
///
/// # Logic
/// 1. 按 `sol_keys` 逐个取出火星日条目，无法解析的条目跳过。
/// 2. 按火星日编号升序排列。
///
/// # Returns
/// 非空的火星日列表；没有任何可用火星日时返回 `FetchError::Empty`。
pub fn parse_sols(body: &str) -> Result<Vec<SolReport>, FetchError> {
    let resp: InsightResponse = decode(body)?;
    let mut reports: Vec<SolReport> = resp
        .sol_keys
        .iter()
        .filter_map(|key| {
            let sol = key.parse::<u32>().ok()?;
            let entry: SolEntry = serde_json::from_value(resp.sols.get(key)?.clone()).ok()?;
            into_report(sol, entry)
        })
        .collect();

    if reports.is_empty() {
        return Err(FetchError::Empty);
    }
    reports.sort_by_key(|r| r.sol);
    Ok(reports)
}

#[async_trait]
impl MarsWeatherFeed for InsightClient {
    async fn latest_sols(&self) -> Result<Vec<SolReport>, FetchError> {
        let url = format!("{}/insight_weather/", self.base_url);
        tracing::debug!("requesting InSight weather");

        let resp = send(self.client.get(&url).query(&[
            ("api_key", self.api_key.as_str()),
            ("feedtype", "json"),
            ("ver", "1.0"),
        ]))
        .await?;

        parse_sols(&read_text(resp).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "sol_keys": ["676", "675", "677"],
        "675": {
            "AT": {"av": -62.314, "ct": 177556, "mn": -96.872, "mx": -15.908},
            "HWS": {"av": 7.233, "ct": 88628, "mn": 1.051, "mx": 22.455},
            "PRE": {"av": 750.563, "ct": 887776, "mn": 722.0901, "mx": 768.791},
            "Season": "fall",
            "Last_UTC": "2020-10-19T22:51:27Z"
        },
        "676": {
            "AT": {"av": -60.0, "mn": -95.0, "mx": -14.0},
            "Season": "fall"
        },
        "677": {
            "HWS": {"av": 5.0}
        },
        "validity_checks": {"sols_checked": ["675", "676", "677"]}
    }"#;

    #[test]
    fn test_parse_sols_sorted_and_filtered() {
        let sols = parse_sols(SAMPLE).unwrap();
        assert_eq!(sols.len(), 2);
        assert_eq!(sols[0].sol, 675);
        assert_eq!(sols[1].sol, 676);
        assert_eq!(sols[0].temp_min_f, -96.872);
        assert_eq!(sols[0].pressure_pa, Some(750.563));
        assert!(sols[0].last_utc.is_some());
        assert!(sols[1].wind_speed_kmh.is_none());
    }

    #[test]
    fn test_parse_sols_without_usable_entries() {
        let body = r#"{"sol_keys": [], "validity_checks": {}}"#;
        assert_eq!(parse_sols(body), Err(FetchError::Empty));
    }
}
