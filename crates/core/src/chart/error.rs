use thiserror::Error;

/// # Summary
/// 图表渲染错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    // 没有任何历史数据可绘制
    #[error("No historical data available for {0}")]
    EmptySeries(String),
    // 渲染过程中的格式化错误
    #[error("Render error: {0}")]
    Render(String),
}
