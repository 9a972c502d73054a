use thiserror::Error;

/// # Summary
/// Provider 边界错误。
///
/// # Invariants
/// - 外部调用失败永远不会以此错误的形式返回，只会被替换为兜底数据。
/// - 仅用于调用方传入了 Provider 不认识的主体键。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    // 未知的主体键 (例如不在关注列表中的股票代码)
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
}
