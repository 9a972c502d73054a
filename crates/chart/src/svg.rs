use orbitdeck_core::chart::entity::{ChartSpec, RenderedChart};
use orbitdeck_core::chart::error::ChartError;
use orbitdeck_core::chart::port::ChartRenderer;
use std::fmt::Write;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

const BACKGROUND: &str = "#111418";
const FOREGROUND: &str = "#e6e6e6";
const GRID: &str = "#ffffff";
const LINE: &str = "#4fc3f7";

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 110.0;
const Y_TICKS: usize = 5;
// 横轴日期标签上限，超出时按步长抽稀
const MAX_X_LABELS: usize = 10;

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

/// # Summary
/// 转义 SVG 文本节点中的特殊字符。
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// # Summary
/// 计算纵轴取值范围，上下各留 5% 余量。
///
/// # Logic
/// 1. 所有点取值相同时以该值为中心扩展 ±1。
fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// # Summary
/// 深色主题的 SVG 折线图渲染器。
///
/// # Invariants
/// - 输出为 UTF-8 编码的独立 SVG 文档。
#[derive(Debug, Clone, Copy)]
pub struct SvgChartRenderer {
    width: f64,
    height: f64,
}

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self::new(1000.0, 600.0)
    }
}

impl SvgChartRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn plot_width(&self) -> f64 {
        (self.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0)
    }

    fn x_at(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return MARGIN_LEFT + self.plot_width() / 2.0;
        }
        MARGIN_LEFT + self.plot_width() * as_f64(index) / as_f64(count - 1)
    }

    fn y_at(&self, value: f64, (low, high): (f64, f64)) -> f64 {
        MARGIN_TOP + self.plot_height() * (1.0 - (value - low) / (high - low))
    }

    /// # Summary
    /// 生成 SVG 文档。
    ///
    /// # Logic
    /// 1. 背景、标题与坐标轴标签。
    /// 2. 纵轴 5 等分的网格线与刻度。
    /// 3. 折线与圆点标记。
    /// 4. 横轴日期标签旋转 45°，点数过多时抽稀。
    fn draw(&self, spec: &ChartSpec) -> Result<String, std::fmt::Error> {
        let values: Vec<f64> = spec.points.iter().map(|p| p.value).collect();
        let range = value_range(&values);
        let count = spec.points.len();
        let (width, height) = (self.width, self.height);
        let plot_bottom = MARGIN_TOP + self.plot_height();
        let plot_right = MARGIN_LEFT + self.plot_width();

        let mut svg = String::with_capacity(4096);
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">"#
        )?;
        writeln!(svg, r#"<rect width="100%" height="100%" fill="{BACKGROUND}"/>"#)?;
        writeln!(
            svg,
            r#"<text x="{:.1}" y="36" fill="{FOREGROUND}" font-size="22" text-anchor="middle">{}</text>"#,
            width / 2.0,
            escape_xml(&spec.title)
        )?;

        for tick in 0..=Y_TICKS {
            let value = range.0 + (range.1 - range.0) * as_f64(tick) / as_f64(Y_TICKS);
            let y = self.y_at(value, range);
            writeln!(
                svg,
                r#"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{plot_right:.1}" y2="{y:.1}" stroke="{GRID}" stroke-opacity="0.3"/>"#
            )?;
            writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" fill="{FOREGROUND}" font-size="12" text-anchor="end">{value:.1}</text>"#,
                MARGIN_LEFT - 8.0,
                y + 4.0
            )?;
        }
        writeln!(
            svg,
            r#"<line x1="{MARGIN_LEFT}" y1="{plot_bottom:.1}" x2="{plot_right:.1}" y2="{plot_bottom:.1}" stroke="{FOREGROUND}"/>"#
        )?;

        let coords: Vec<(f64, f64)> = spec
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (self.x_at(i, count), self.y_at(p.value, range)))
            .collect();
        let polyline = coords
            .iter()
            .map(|(x, y)| format!("{x:.1},{y:.1}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(
            svg,
            r#"<polyline points="{polyline}" fill="none" stroke="{LINE}" stroke-width="2"/>"#
        )?;
        for (x, y) in &coords {
            writeln!(svg, r#"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{LINE}"/>"#)?;
        }

        let step = count.div_ceil(MAX_X_LABELS).max(1);
        for (i, point) in spec.points.iter().enumerate().step_by(step) {
            let x = self.x_at(i, count);
            let y = plot_bottom + 18.0;
            writeln!(
                svg,
                r#"<text x="{x:.1}" y="{y:.1}" fill="{FOREGROUND}" font-size="12" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
                point.date.format("%Y-%m-%d")
            )?;
        }

        writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" fill="{FOREGROUND}" font-size="14" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + self.plot_width() / 2.0,
            height - 12.0,
            escape_xml(&spec.x_label)
        )?;
        let y_mid = MARGIN_TOP + self.plot_height() / 2.0;
        writeln!(
            svg,
            r#"<text x="24" y="{y_mid:.1}" fill="{FOREGROUND}" font-size="14" text-anchor="middle" transform="rotate(-90 24 {y_mid:.1})">{}</text>"#,
            escape_xml(&spec.y_label)
        )?;
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

impl ChartRenderer for SvgChartRenderer {
    /// # Summary
    /// 渲染折线图。
    ///
    /// # Returns
    /// 没有数据点时返回 `ChartError::EmptySeries`。
    fn render(&self, spec: &ChartSpec) -> Result<RenderedChart, ChartError> {
        if spec.points.is_empty() {
            return Err(ChartError::EmptySeries(spec.title.clone()));
        }
        let svg = self
            .draw(spec)
            .map_err(|e| ChartError::Render(e.to_string()))?;
        tracing::debug!(title = %spec.title, points = spec.points.len(), bytes = svg.len(), "Chart rendered");
        Ok(RenderedChart {
            content_type: SVG_CONTENT_TYPE,
            bytes: svg.into_bytes(),
        })
    }
}
