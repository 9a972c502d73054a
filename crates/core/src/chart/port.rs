use crate::chart::entity::{ChartSpec, RenderedChart};
use crate::chart::error::ChartError;

/// # Summary
/// 图表渲染器接口。
///
/// # Invariants
/// - 渲染是同步、CPU 密集的纯计算，不得发起 I/O。
pub trait ChartRenderer: Send + Sync {
    /// # Summary
    /// 将图表描述渲染为图像。
    ///
    /// # Arguments
    /// * `spec`: 图表描述。
    ///
    /// # Returns
    /// 成功返回图像；数据点为空时返回 `ChartError::EmptySeries`。
    fn render(&self, spec: &ChartSpec) -> Result<RenderedChart, ChartError>;
}
