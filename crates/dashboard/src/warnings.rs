use orbitdeck_core::layout::CardId;
use orbitdeck_core::observation::entity::{Degradation, Observed};
use serde::Serialize;

/// 额度告警的文本特征 (兼容只带说明文本的数据)
const LIMIT_MARKERS: [&str; 2] = ["API limit", "quota"];

/// # Summary
/// 仪表盘顶部展示的告警。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    // 触发告警的卡片
    pub source: CardId,
    pub message: String,
}

/// # Summary
/// 判断一条观测数据是否触发额度告警。
///
/// # Logic
/// 1. 优先看类型化的降级原因是否为 `RateLimited`。
/// 2. 其次在说明文本中查找 "API limit" 或 "quota"。
pub fn trips_limit<T>(observed: &Observed<T>) -> bool {
    if observed.origin.degradation() == Some(Degradation::RateLimited) {
        return true;
    }
    observed
        .note
        .as_deref()
        .is_some_and(|note| LIMIT_MARKERS.iter().any(|marker| note.contains(marker)))
}

fn card_label(card: CardId) -> &'static str {
    match card {
        CardId::Weather => "Weather",
        CardId::Stocks => "Stocks",
        CardId::News => "News",
    }
}

/// # Summary
/// 告警收集器。每个数据提供者至多产生一条告警。
#[derive(Debug, Default)]
pub struct WarningSet {
    warnings: Vec<Warning>,
}

impl WarningSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Summary
    /// 检查某个提供者的全部观测数据。
    ///
    /// # Logic
    /// 1. 找到第一条触发告警的数据，以它的说明作为告警文本。
    /// 2. 同一来源已有告警时忽略。
    ///
    /// # Arguments
    /// * `source`: 数据所属卡片。
    /// * `records`: 该提供者本次返回的全部观测数据。
    pub fn inspect<'a, T: 'a>(
        &mut self,
        source: CardId,
        records: impl IntoIterator<Item = &'a Observed<T>>,
    ) {
        if self.warnings.iter().any(|w| w.source == source) {
            return;
        }
        let Some(tripped) = records.into_iter().find(|r| trips_limit(r)) else {
            return;
        };

        let detail = tripped.note.as_deref().unwrap_or("API limit reached");
        tracing::debug!(source = %source, detail, "Provider tripped the API limit warning");
        self.warnings.push(Warning {
            source,
            message: format!("{} data may be stale. {detail}", card_label(source)),
        });
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.warnings
    }
}
