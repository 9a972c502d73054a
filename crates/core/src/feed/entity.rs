use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// # Summary
/// 地球城市当前天气 (已换算为公制单位)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthConditions {
    // 城市名
    pub city: String,
    // 温度 (摄氏度)
    pub temperature_c: f64,
    // 天气主分类，例如 "Clouds"
    pub condition: String,
    // 相对湿度 (%)
    pub humidity: f64,
    // 风速 (km/h)
    pub wind_speed_kmh: f64,
    // 气压 (hPa)
    pub pressure_hpa: Option<f64>,
    // 观测时间
    pub observed_at: DateTime<Utc>,
}

/// # Summary
/// InSight 着陆器上报的单个火星日数据。
///
/// # Invariants
/// - 温度保持上游原始单位 (华氏度)，由 Provider 负责换算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolReport {
    // 火星日编号
    pub sol: u32,
    // 平均气温 (°F)
    pub temp_avg_f: f64,
    // 最低气温 (°F)
    pub temp_min_f: f64,
    // 最高气温 (°F)
    pub temp_max_f: f64,
    // 平均气压 (Pa)
    pub pressure_pa: Option<f64>,
    // 平均水平风速 (km/h)
    pub wind_speed_kmh: Option<f64>,
    // 该火星日最后一次采样时间
    pub last_utc: Option<DateTime<Utc>>,
}

/// # Summary
/// 行情接口返回的原始报价，字段保持上游的字符串形式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub symbol: String,
    // 例如 "180.2500"
    pub price: String,
    // 例如 "5000000"
    pub volume: String,
    // 例如 "1.2000%"
    pub change_percent: String,
}

/// # Summary
/// 公司概况。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: String,
}

/// # Summary
/// 日线原始数据 (已解析为数值)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// # Summary
/// 新闻检索参数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsQuery {
    // 检索表达式
    pub query: String,
    // 起始日期 (包含)
    pub from: NaiveDate,
    // 语言代码
    pub language: String,
    // 排序方式
    pub sort_by: String,
    // 单页条数
    pub page_size: usize,
}
