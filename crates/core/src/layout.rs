//! # 卡片布局
//!
//! 仪表盘由固定的三张卡片组成，用户可以调整其顺序。
//! 布局是按会话保存的值，由 API 层通过请求上下文传递。

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 仪表盘卡片标识。每张卡片对应一个数据提供者。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardId {
    Weather,
    Stocks,
    News,
}

impl CardId {
    /// 默认展示顺序
    pub const ALL: [CardId; 3] = [CardId::Weather, CardId::Stocks, CardId::News];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardId::Weather => "weather",
            CardId::Stocks => "stocks",
            CardId::News => "news",
        }
    }
}

impl FromStr for CardId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weather" => Ok(CardId::Weather),
            "stocks" => Ok(CardId::Stocks),
            "news" => Ok(CardId::News),
            _ => Err(format!("Unknown card: {}", s)),
        }
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// # Summary
/// 判断候选顺序是否为允许集合的一个完整排列。
///
/// # Logic
/// 1. 长度必须与允许集合一致。
/// 2. 允许集合中的每个元素必须在候选中恰好出现一次。
///
/// # Arguments
/// * `candidate`: 用户提交的顺序。
/// * `allowed`: 固定的允许集合 (元素互不相同)。
///
/// # Returns
/// 是完整排列返回 true。
pub fn is_valid_order<T: PartialEq>(candidate: &[T], allowed: &[T]) -> bool {
    candidate.len() == allowed.len()
        && allowed
            .iter()
            .all(|item| candidate.iter().filter(|c| *c == item).count() == 1)
}

/// # Summary
/// 单个会话的卡片顺序。
///
/// # Invariants
/// - 内部顺序始终是 `CardId::ALL` 的一个完整排列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLayout(Vec<CardId>);

impl Default for CardLayout {
    fn default() -> Self {
        Self(CardId::ALL.to_vec())
    }
}

impl CardLayout {
    /// # Summary
    /// 从用户提交的卡片名构造布局。
    ///
    /// # Logic
    /// 1. 逐个解析卡片名，出现未知名称即拒绝。
    /// 2. 校验解析结果是否为完整排列。
    ///
    /// # Arguments
    /// * `names`: 卡片名列表。
    ///
    /// # Returns
    /// 合法返回新布局，否则返回 None。
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let cards = names
            .iter()
            .map(|name| name.as_ref().parse::<CardId>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        is_valid_order(&cards, &CardId::ALL).then_some(Self(cards))
    }

    pub fn cards(&self) -> &[CardId] {
        &self.0
    }
}
