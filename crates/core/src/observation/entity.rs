use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// # Summary
/// 数据降级原因，记录某条数据为何不是实时数据。
///
/// # Invariants
/// - 仅出现在 `Origin::Fallback` 与 `Origin::Simulated` 中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// 未配置外部服务凭据
    MissingCredentials,
    /// 外部服务报告调用额度耗尽
    RateLimited,
    /// 网络错误、非成功状态码或响应格式异常
    Upstream,
    /// 外部服务返回成功但内容为空
    NoData,
    /// 该数据源不提供此类数据 (例如地球历史天气)
    NotSupported,
}

/// # Summary
/// 数据来源标签，区分实时、静态兜底与随机模拟三种数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Origin {
    // 来自外部服务的实时数据
    Live,
    // 硬编码的静态兜底数据
    Fallback(Degradation),
    // 基于兜底基准值随机扰动得到的模拟数据
    Simulated(Degradation),
}

impl Origin {
    /// # Summary
    /// 返回降级原因，实时数据返回 None。
    pub fn degradation(&self) -> Option<Degradation> {
        match self {
            Origin::Live => None,
            Origin::Fallback(reason) | Origin::Simulated(reason) => Some(*reason),
        }
    }

    /// # Summary
    /// 生成面向 UI 的可读说明。
    ///
    /// # Logic
    /// 1. 实时数据没有说明。
    /// 2. 兜底/模拟数据根据降级原因选择固定文案，额度耗尽的文案必须包含 "API limit"。
    ///
    /// # Returns
    /// 非实时数据返回说明文本。
    pub fn note(&self) -> Option<String> {
        let text = match self {
            Origin::Live => return None,
            Origin::Fallback(Degradation::MissingCredentials) => {
                "Using fallback data - API key not configured"
            }
            Origin::Fallback(Degradation::RateLimited) => "Using fallback data - API limit reached",
            Origin::Fallback(Degradation::NoData) => "Using fallback data - No data returned",
            Origin::Fallback(Degradation::NotSupported) => {
                "Using fallback data - live data not available"
            }
            Origin::Fallback(Degradation::Upstream) => {
                "Using fallback data due to connection issues"
            }
            Origin::Simulated(Degradation::MissingCredentials) => {
                "Using simulated data - API key not configured"
            }
            Origin::Simulated(Degradation::RateLimited) => {
                "Using simulated data - API limit reached"
            }
            Origin::Simulated(Degradation::NotSupported) => {
                "Using simulated data - historical data not available"
            }
            Origin::Simulated(Degradation::Upstream | Degradation::NoData) => {
                "Using simulated data due to API issues"
            }
        };
        Some(text.to_string())
    }
}

/// # Summary
/// 带来源标签的观测数据包装，所有 Provider 的输出都以此形式交付。
///
/// # Invariants
/// - 创建后不可变。
/// - `note` 仅在 `origin` 不是 `Live` 时存在。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observed<T> {
    /// 实际数据，序列化时展开到顶层
    #[serde(flatten)]
    pub record: T,
    /// 数据来源
    pub origin: Origin,
    /// 面向 UI 的降级说明
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl<T> Observed<T> {
    /// 包装实时数据
    pub fn live(record: T) -> Self {
        Self::with_origin(record, Origin::Live)
    }

    /// 包装静态兜底数据
    pub fn fallback(record: T, reason: Degradation) -> Self {
        Self::with_origin(record, Origin::Fallback(reason))
    }

    /// 包装随机模拟数据
    pub fn simulated(record: T, reason: Degradation) -> Self {
        Self::with_origin(record, Origin::Simulated(reason))
    }

    fn with_origin(record: T, origin: Origin) -> Self {
        Self {
            note: origin.note(),
            record,
            origin,
        }
    }

    pub fn is_live(&self) -> bool {
        self.origin == Origin::Live
    }
}

/// # Summary
/// 单个行星的天气观测。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    // 温度 (摄氏度)
    pub temperature: f64,
    // 天气状况标签，例如 "Sunny"
    pub condition: String,
    // 相对湿度 (%)
    pub humidity: f64,
    // 风速 (km/h)
    pub wind_speed: f64,
    // 气压 (hPa / Pa，取决于数据源)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    // 火星日编号，仅火星数据存在
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sol: Option<u32>,
    // 观测时间
    pub timestamp: DateTime<Utc>,
}

/// # Summary
/// 单只股票的行情快照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    // 公司名称
    pub name: String,
    // 最新价
    pub current_price: f64,
    // 涨跌幅 (%)
    pub change: f64,
    // 成交量
    pub volume: u64,
    // 快照时间
    pub timestamp: DateTime<Utc>,
}

/// # Summary
/// 新闻来源。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// # Summary
/// 单篇新闻。字段命名与 NewsAPI 保持一致，前端可直接消费。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    pub source: ArticleSource,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
}

/// # Summary
/// 一组新闻标题。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headlines {
    pub articles: Vec<Article>,
    pub timestamp: DateTime<Utc>,
}

/// # Summary
/// 单日天气历史点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub temperature: f64,
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sol: Option<u32>,
}

/// # Summary
/// 单日价格 K 线。
///
/// # Invariants
/// - `high` 大于或等于 `open`, `close`, `low`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// # Summary
/// 单个主体的历史序列。
///
/// # Invariants
/// - `points` 按日期升序排列 (最旧的在前)，每天至多一个点。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSeries<T> {
    // 主体键 (行星名或股票代码)
    pub subject: String,
    // 展示名称 (例如公司全称)
    pub label: String,
    pub points: Vec<T>,
}

/// # Summary
/// 多主体的当前数据集合：主体键 → 观测数据。
///
/// # Invariants
/// - 保持插入顺序，序列化为 JSON 对象时键的顺序与插入顺序一致。
/// - 同一主体键至多出现一次，重复插入会覆盖旧值。
#[derive(Debug, Clone)]
pub struct ProviderResult<T> {
    entries: Vec<(String, Observed<T>)>,
}

impl<T> Default for ProviderResult<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> ProviderResult<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Summary
    /// 插入或覆盖某个主体的数据。
    pub fn insert(&mut self, key: impl Into<String>, value: Observed<T>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Observed<T>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Observed<T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// # Summary
    /// 遍历所有存在的降级说明。
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(_, v)| v.note.as_deref())
    }
}

impl<T: Serialize> Serialize for ProviderResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
