use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use orbitdeck_core::common::time::TimeProvider;
use orbitdeck_core::feed::entity::NewsQuery;
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::{FeedHandle, NewsFeed};
use orbitdeck_core::observation::entity::{Article, ArticleSource, Headlines, Observed};
use orbitdeck_core::observation::port::NewsProvider;
use std::sync::Arc;

/// 默认检索表达式
pub const SPACE_QUERY: &str = "space exploration OR NASA OR SpaceX OR Blue Origin";
/// 对外展示的新闻条数上限
pub const MAX_HEADLINES: usize = 5;

/// # Summary
/// 三篇固定兜底新闻，发布时间取当前时间。
pub fn fallback_articles(now: DateTime<Utc>) -> Vec<Article> {
    let article = |title: &str, description: &str, url: &str, source: &str| Article {
        title: title.to_string(),
        description: Some(description.to_string()),
        url: url.to_string(),
        source: ArticleSource {
            id: None,
            name: source.to_string(),
        },
        published_at: now,
    };

    vec![
        article(
            "NASA Announces New Mars Mission",
            "NASA reveals plans for a new Mars exploration mission scheduled for 2026.",
            "https://www.nasa.gov",
            "NASA",
        ),
        article(
            "SpaceX Successfully Launches Starlink Mission",
            "SpaceX completes another successful Starlink satellite deployment.",
            "https://www.spacex.com",
            "SpaceX",
        ),
        article(
            "Blue Origin Tests New Rocket Engine",
            "Blue Origin conducts successful test of their new BE-4 rocket engine.",
            "https://www.blueorigin.com",
            "Blue Origin",
        ),
    ]
}

/// # Summary
/// 航天新闻提供者。
pub struct NewsService {
    feed: FeedHandle<dyn NewsFeed>,
    page_size: usize,
    clock: Arc<dyn TimeProvider>,
}

impl NewsService {
    pub fn new(
        feed: FeedHandle<dyn NewsFeed>,
        page_size: usize,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            feed,
            page_size,
            clock,
        }
    }

    /// # Summary
    /// 检索过去 `days` 天的新闻并截取前 5 篇。
    ///
    /// # Logic
    /// 1. 数据源不可用时不发起调用，直接返回兜底新闻。
    /// 2. 起始日期为 `now - days`，英文，按相关性排序。
    /// 3. 结果为空视为 `NoData`。
    /// 4. 任何失败都替换为 3 篇固定兜底新闻。
    async fn search(&self, query: &str, days: usize) -> Observed<Headlines> {
        let now = self.clock.now();
        match self.search_live(query, days, now).await {
            Ok(mut articles) => {
                articles.truncate(MAX_HEADLINES);
                Observed::live(Headlines {
                    articles,
                    timestamp: now,
                })
            }
            Err(err) => {
                tracing::warn!(query, error = %err, "News search unavailable, serving fallback articles");
                Observed::fallback(
                    Headlines {
                        articles: fallback_articles(now),
                        timestamp: now,
                    },
                    err.degradation(),
                )
            }
        }
    }

    async fn search_live(
        &self,
        query: &str,
        days: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, FetchError> {
        let feed = self.feed.as_ref().map_err(Clone::clone)?;
        let lookback = i64::try_from(days.max(1)).unwrap_or(i64::MAX);
        let from = now
            .checked_sub_signed(Duration::days(lookback.min(3650)))
            .unwrap_or(now)
            .date_naive();

        let request = NewsQuery {
            query: query.to_string(),
            from,
            language: "en".to_string(),
            sort_by: "relevancy".to_string(),
            page_size: self.page_size.max(MAX_HEADLINES),
        };
        tracing::debug!(query, %from, "Searching news");

        let articles = feed.search(&request).await?;
        if articles.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(articles)
    }
}

#[async_trait]
impl NewsProvider for NewsService {
    async fn fetch_current(&self) -> Observed<Headlines> {
        self.search(SPACE_QUERY, 1).await
    }

    async fn fetch_historical(&self, query: &str, days: usize) -> Observed<Headlines> {
        let query = if query.trim().is_empty() {
            SPACE_QUERY
        } else {
            query
        };
        self.search(query, days).await
    }
}
