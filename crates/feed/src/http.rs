//! 共享的 HTTP 客户端构建与响应处理。

use orbitdeck_core::feed::error::FetchError;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("orbitdeck/", env!("CARGO_PKG_VERSION"));

/// # Summary
/// 安装进程级 rustls 加密后端 (ring)。
///
/// # Logic
/// 1. `reqwest` 以 `rustls-no-provider` 方式编译，构建客户端前必须存在默认后端。
/// 2. 重复安装会返回错误，此时说明已有后端，直接忽略。
pub fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::trace!("rustls crypto provider already installed");
    }
}

/// # Summary
/// 构建带超时与 User-Agent 的 HTTP 客户端。
///
/// # Arguments
/// * `timeout`: 单次请求的整体超时。
///
/// # Returns
/// 成功返回客户端，失败返回 `FetchError::ClientInit`。
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    install_crypto_provider();
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::ClientInit(e.to_string()))
}

/// # Summary
/// 校验凭据是否存在，空白字符串视为未配置。
///
/// # Arguments
/// * `key`: 可选的凭据。
/// * `var`: 对应的环境变量名，用于错误信息。
pub fn require_key(key: Option<String>, var: &str) -> Result<String, FetchError> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| FetchError::MissingCredentials(var.to_string()))
}

/// # Summary
/// 发送请求并做状态码检查。
///
/// # Logic
/// 1. 网络层错误映射为 `FetchError::Network`。
/// 2. 429 映射为额度耗尽，其余非 2xx 映射为 `FetchError::Status`。
pub(crate) async fn send(request: RequestBuilder) -> Result<Response, FetchError> {
    let resp = request
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited(format!("HTTP {}", status)));
    }
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(resp)
}

/// # Summary
/// 读取响应体并反序列化为强类型结构。
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, FetchError> {
    decode(&read_text(resp).await?)
}

/// 读取完整响应体文本
pub(crate) async fn read_text(resp: Response) -> Result<String, FetchError> {
    resp.text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))
}

/// 从 JSON 文本解码，解析失败映射为 `FetchError::Parse`
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_key_rejects_blank() {
        assert_eq!(
            require_key(None, "NEWS_API_KEY"),
            Err(FetchError::MissingCredentials("NEWS_API_KEY".to_string()))
        );
        assert!(require_key(Some("   ".to_string()), "NEWS_API_KEY").is_err());
        assert_eq!(require_key(Some(" k ".to_string()), "X"), Ok("k".to_string()));
    }

    #[test]
    fn test_decode_maps_parse_errors() {
        let result: Result<serde_json::Value, _> = decode("{not json");
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }
}
