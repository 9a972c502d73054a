//! # 配置加载
//!
//! 优先级从低到高：结构体默认值 → `config/orbitdeck.toml` (可选) → `ORBITDECK__*` 环境变量。
//! 外部服务凭据另外从约定俗成的环境变量名读取 (例如 `NEWS_API_KEY`)，`.env` 文件由 `dotenvy` 预先加载。

use config::{Config, ConfigError, Environment, File, Source};
use orbitdeck_core::config::{AppConfig, Credentials};
use orbitdeck_feed::alphavantage::ALPHA_VANTAGE_KEY_VAR;
use orbitdeck_feed::insight::NASA_KEY_VAR;
use orbitdeck_feed::newsapi::NEWS_API_KEY_VAR;
use orbitdeck_feed::openweather::OPENWEATHER_KEY_VAR;

/// 配置文件路径 (不含扩展名)
const CONFIG_FILE: &str = "config/orbitdeck";
/// 环境变量覆盖前缀，例如 `ORBITDECK__SERVER__PORT=9090`
const ENV_PREFIX: &str = "ORBITDECK";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 加载 `.env` (不存在时忽略)。
/// 2. 叠加配置文件与 `ORBITDECK__*` 环境变量。
/// 3. 用约定的凭据环境变量覆盖凭据。
pub fn load() -> Result<AppConfig, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        // 启动早期日志尚未初始化
        eprintln!("No .env loaded: {e}");
    }
    let mut config = assemble(File::with_name(CONFIG_FILE).required(false))?;
    apply_credentials(&mut config.credentials, |var| std::env::var(var).ok());
    Ok(config)
}

/// # Summary
/// 以给定的文件源为基础叠加环境变量覆盖。
fn assemble<S>(file: S) -> Result<AppConfig, ConfigError>
where
    S: Source + Send + Sync + 'static,
{
    Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

/// # Summary
/// 从凭据环境变量覆盖配置中的凭据，空白值视为未设置。
///
/// # Arguments
/// * `credentials`: 待覆盖的凭据。
/// * `lookup`: 环境变量读取函数。
fn apply_credentials(credentials: &mut Credentials, lookup: impl Fn(&str) -> Option<String>) {
    let read = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
    if let Some(key) = read(NEWS_API_KEY_VAR) {
        credentials.news_api_key = Some(key);
    }
    if let Some(key) = read(ALPHA_VANTAGE_KEY_VAR) {
        credentials.alpha_vantage_api_key = Some(key);
    }
    if let Some(key) = read(OPENWEATHER_KEY_VAR) {
        credentials.openweather_api_key = Some(key);
    }
    if let Some(key) = read(NASA_KEY_VAR) {
        credentials.nasa_api_key = Some(key);
    }
}
