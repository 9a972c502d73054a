use crate::observation::entity::Degradation;
use thiserror::Error;

/// # Summary
/// 外部数据源调用错误，覆盖凭据缺失、网络、状态码、解析与额度耗尽等情况。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 每个外部调用只尝试一次，错误不区分瞬时或永久。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    // 未配置凭据，参数为对应的环境变量名
    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(String),
    // HTTP 客户端初始化失败
    #[error("Client init error: {0}")]
    ClientInit(String),
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 非成功的 HTTP 状态码
    #[error("HTTP status {0}")]
    Status(u16),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 外部服务拒绝了请求 (业务层错误信息)
    #[error("Rejected by upstream: {0}")]
    Rejected(String),
    // 外部服务报告调用额度耗尽
    #[error("API limit reached: {0}")]
    RateLimited(String),
    // 外部服务返回了空数据
    #[error("No data returned")]
    Empty,
}

impl FetchError {
    /// # Summary
    /// 将调用错误折叠为数据降级原因。
    ///
    /// # Returns
    /// 对应的 `Degradation`。
    pub fn degradation(&self) -> Degradation {
        match self {
            FetchError::MissingCredentials(_) => Degradation::MissingCredentials,
            FetchError::RateLimited(_) => Degradation::RateLimited,
            FetchError::Empty => Degradation::NoData,
            FetchError::ClientInit(_)
            | FetchError::Network(_)
            | FetchError::Status(_)
            | FetchError::Parse(_)
            | FetchError::Rejected(_) => Degradation::Upstream,
        }
    }
}
