use crate::http::{build_client, decode, read_text, require_key};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orbitdeck_core::feed::entity::NewsQuery;
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::NewsFeed;
use orbitdeck_core::observation::entity::{Article, ArticleSource};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 凭据对应的环境变量名
pub const NEWS_API_KEY_VAR: &str = "NEWS_API_KEY";
const NEWS_API_BASE_URL: &str = "https://newsapi.org";

/// # Summary
/// NewsAPI `/v2/everything` 检索客户端。
///
/// # Invariants
/// - 构造成功即意味着凭据存在。
/// - 凭据通过 `X-Api-Key` 请求头传递，不出现在 URL 中。
#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    /// # Summary
    /// 创建客户端。
    ///
    /// # Returns
    /// 凭据缺失返回 `FetchError::MissingCredentials`，客户端构建失败返回 `FetchError::ClientInit`。
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, FetchError> {
        let api_key = require_key(api_key, NEWS_API_KEY_VAR)?;
        Ok(Self {
            client: build_client(timeout)?,
            api_key,
            base_url: NEWS_API_BASE_URL.to_string(),
        })
    }

    /// 覆盖服务地址 (测试中指向本地模拟服务)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// NewsAPI 响应，成功与失败共用一个结构
#[derive(Deserialize, Debug)]
struct NewsResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    // 失败时的错误码，例如 "rateLimited", "apiKeyInvalid"
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawArticle {
    source: RawSource,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
struct RawSource {
    id: Option<String>,
    name: Option<String>,
}

// 被下架的文章以此标题占位
const REMOVED_MARKER: &str = "[Removed]";

impl RawArticle {
    /// 缺少标题、链接或发布时间的文章以及已下架的文章被丢弃
    fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| t != REMOVED_MARKER)?;
        Some(Article {
            title,
            description: self.description,
            url: self.url?,
            source: ArticleSource {
                id: self.source.id,
                name: self.source.name.unwrap_or_else(|| "Unknown".to_string()),
            },
            published_at: self.published_at?,
        })
    }
}

fn upstream_error(code: Option<String>, message: Option<String>) -> FetchError {
    let message = message.unwrap_or_else(|| "unknown error".to_string());
    match code.as_deref() {
        Some("rateLimited") => FetchError::RateLimited(message),
        _ => FetchError::Rejected(message),
    }
}

/// # Summary
/// 解析检索响应。
///
/// # Logic
/// 1. 非 2xx 时尝试读取错误体，`rateLimited` 或 429 视为额度耗尽。
/// 2. `status != "ok"` 视为被上游拒绝。
/// 3. 丢弃不完整的文章，保持上游顺序。
///
/// # Arguments
/// * `http_status`: HTTP 状态码。
/// * `body`: 响应体文本。
///
/// # Returns
/// 可能为空的新闻列表。
pub fn parse_search(http_status: u16, body: &str) -> Result<Vec<Article>, FetchError> {
    if !(200..300).contains(&http_status) {
        return Err(match decode::<NewsResponse>(body) {
            Ok(resp) if resp.code.is_some() => upstream_error(resp.code, resp.message),
            _ if http_status == 429 => FetchError::RateLimited(format!("HTTP {}", http_status)),
            _ => FetchError::Status(http_status),
        });
    }

    let resp: NewsResponse = decode(body)?;
    if resp.status != "ok" {
        return Err(upstream_error(resp.code, resp.message));
    }

    Ok(resp
        .articles
        .into_iter()
        .filter_map(RawArticle::into_article)
        .collect())
}

#[async_trait]
impl NewsFeed for NewsApiClient {
    async fn search(&self, query: &NewsQuery) -> Result<Vec<Article>, FetchError> {
        let url = format!("{}/v2/everything", self.base_url);
        let from = query.from.format("%Y-%m-%d").to_string();
        let page_size = query.page_size.to_string();
        tracing::debug!(q = %query.query, %from, "requesting NewsAPI search");

        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", self.api_key.as_str())
            .query(&[
                ("q", query.query.as_str()),
                ("from", from.as_str()),
                ("language", query.language.as_str()),
                ("sortBy", query.sort_by.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = read_text(resp).await?;
        parse_search(status, &body)
    }
}
