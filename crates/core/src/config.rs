use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProviderConfig,
    pub credentials: Credentials,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// 监听地址，例如 `"0.0.0.0:8080"`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 外部数据源相关的调优参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// 地球天气查询的城市
    pub city: String,
    /// HTTP 客户端超时 (秒)
    pub http_timeout_secs: u64,
    /// 逐只股票调用之间的节流间隔 (毫秒)
    pub stock_pacing_ms: u64,
    /// 新闻检索单页条数
    pub news_page_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            city: "London".to_string(),
            http_timeout_secs: 10,
            stock_pacing_ms: 200,
            news_page_size: 20,
        }
    }
}

/// 外部服务凭据。任何一项缺失都只会让对应 Provider 进入降级模式。
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub news_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub nasa_api_key: Option<String>,
}

/// NASA 公共演示密钥，未配置 `NASA_API_KEY` 时使用
pub const NASA_DEMO_KEY: &str = "DEMO_KEY";

impl Credentials {
    /// NASA 密钥，缺省时回落到公共演示密钥
    pub fn nasa_key(&self) -> String {
        self.nasa_api_key
            .clone()
            .unwrap_or_else(|| NASA_DEMO_KEY.to_string())
    }
}

// 凭据不得出现在日志中
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(key: &Option<String>) -> &'static str {
            if key.is_some() { "<set>" } else { "<unset>" }
        }
        f.debug_struct("Credentials")
            .field("news_api_key", &mask(&self.news_api_key))
            .field("alpha_vantage_api_key", &mask(&self.alpha_vantage_api_key))
            .field("openweather_api_key", &mask(&self.openweather_api_key))
            .field("nasa_api_key", &mask(&self.nasa_api_key))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认日志级别，`RUST_LOG` 优先
    pub level: String,
    /// 滚动日志文件目录，缺省时只输出到控制台
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}
