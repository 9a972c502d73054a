//! # 模拟数据生成
//!
//! 无外部调用的纯计算：基于兜底基准值与注入的随机源生成看似实时的数据。

use chrono::NaiveDate;
use orbitdeck_core::common::random::RandomSource;
use orbitdeck_core::common::round_to;
use orbitdeck_core::observation::entity::{PriceBar, WeatherDay};

/// 当前价相对基准价的最大漂移 (±2%)
pub const PRICE_DRIFT: f64 = 0.02;
/// 成交量相对基准量的最大漂移 (±10%)
pub const VOLUME_DRIFT: f64 = 0.10;
/// 模拟日线中影线相对实体的最大延伸 (1%)
const WICK_SPREAD: f64 = 0.01;

/// # Summary
/// 生成以 `today` 结尾、按日期升序排列的连续日期。
///
/// # Arguments
/// * `today`: 最后一天。
/// * `count`: 天数。
pub fn trailing_dates(today: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = std::iter::successors(Some(today), |d| d.pred_opt())
        .take(count)
        .collect();
    dates.reverse();
    dates
}

/// # Summary
/// 按比例缩放成交量并截断为整数。
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn scale_volume(base: u64, drift: f64) -> u64 {
    (base as f64 * (1.0 + drift)).max(0.0).trunc() as u64
}

/// # Summary
/// 模拟一次报价漂移。
///
/// # Logic
/// 1. 价格漂移 d 取自 `[-2%, +2%]`，价格 = 基准价 × (1 + d)，保留两位小数。
/// 2. 涨跌幅 = d × 100，保留两位小数。
/// 3. 成交量漂移取自 `[-10%, +10%]`。
///
/// # Returns
/// `(价格, 涨跌幅, 成交量)`。
pub fn drift_quote(base_price: f64, base_volume: u64, random: &dyn RandomSource) -> (f64, f64, u64) {
    let price_drift = random.uniform(-PRICE_DRIFT, PRICE_DRIFT);
    let volume_drift = random.uniform(-VOLUME_DRIFT, VOLUME_DRIFT);
    (
        round_to(base_price * (1.0 + price_drift), 2),
        round_to(price_drift * 100.0, 2),
        scale_volume(base_volume, volume_drift),
    )
}

/// # Summary
/// 生成随机游走的日线序列。
///
/// # Logic
/// 1. 从基准价出发，每天复合一个 `[-2%, +2%]` 的漂移得到收盘价。
/// 2. 开盘价为前一日收盘价。
/// 3. 最高价/最低价在实体基础上再向外延伸至多 1%。
/// 4. 成交量在基准量基础上漂移 `[-10%, +10%]`。
///
/// # Arguments
/// * `base_price`: 起始价格。
/// * `base_volume`: 基准成交量。
/// * `dates`: 升序日期。
/// * `random`: 随机源。
///
/// # Returns
/// 与 `dates` 一一对应的日线。
pub fn random_walk(
    base_price: f64,
    base_volume: u64,
    dates: &[NaiveDate],
    random: &dyn RandomSource,
) -> Vec<PriceBar> {
    let mut close = base_price;
    dates
        .iter()
        .map(|date| {
            let open = close;
            close = open * (1.0 + random.uniform(-PRICE_DRIFT, PRICE_DRIFT));
            let high = open.max(close) * (1.0 + random.uniform(0.0, WICK_SPREAD));
            let low = open.min(close) * (1.0 - random.uniform(0.0, WICK_SPREAD));
            PriceBar {
                date: *date,
                open: round_to(open, 2),
                high: round_to(high, 2),
                low: round_to(low, 2),
                close: round_to(close, 2),
                volume: scale_volume(base_volume, random.uniform(-VOLUME_DRIFT, VOLUME_DRIFT)),
            }
        })
        .collect()
}

/// # Summary
/// 生成随机温度历史。
///
/// # Arguments
/// * `range`: 温度闭区间 (摄氏度)。
/// * `conditions`: 候选天气状况。
/// * `dates`: 升序日期。
/// * `random`: 随机源。
pub fn random_weather(
    range: (f64, f64),
    conditions: &[&str],
    dates: &[NaiveDate],
    random: &dyn RandomSource,
) -> Vec<WeatherDay> {
    dates
        .iter()
        .map(|date| WeatherDay {
            date: *date,
            temperature: round_to(random.uniform(range.0, range.1), 1),
            condition: conditions
                .get(random.pick(conditions.len()))
                .copied()
                .unwrap_or("Clear")
                .to_string(),
            sol: None,
        })
        .collect()
}
