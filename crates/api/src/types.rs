//! # DTO (Data Transfer Object) 层
//!
//! 面向前端 JSON 输入输出的轻量结构体。
//! 仪表盘数据直接序列化核心实体，这里只定义 API 自有的请求与响应。

use orbitdeck_core::layout::{CardId, CardLayout};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ============================================================
//  通用响应包装
// ============================================================

/// 统一成功响应包装
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

// ============================================================
//  查询参数
// ============================================================

/// 历史数据查询参数
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// 回溯天数，缺省 7，限制在 1~30
    #[param(example = 7)]
    pub days: Option<usize>,
}

/// 新闻检索参数
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsHistoryQuery {
    /// 检索表达式，缺省为航天关键字
    #[param(example = "Artemis")]
    pub q: Option<String>,
    /// 回溯天数，缺省 7，限制在 1~30
    #[param(example = 7)]
    pub days: Option<usize>,
}

// ============================================================
//  卡片布局 DTO
// ============================================================

/// 卡片重排请求体
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LayoutRequest {
    /// 新的卡片顺序，必须是 weather / stocks / news 的完整排列
    #[schema(example = json!(["news", "weather", "stocks"]))]
    pub order: Vec<String>,
}

/// 卡片布局响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LayoutResponse {
    /// 当前生效的卡片顺序
    pub order: Vec<CardId>,
    /// 本次请求是否修改了布局
    pub updated: bool,
}

impl LayoutResponse {
    pub fn new(layout: &CardLayout, updated: bool) -> Self {
        Self {
            order: layout.cards().to_vec(),
            updated,
        }
    }
}
