pub mod random;
pub mod time;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 仪表盘关注的行星，天气数据的主体键。
///
/// # Invariants
/// - 序列化形式固定为小写名称 (`earth` / `mars`)，与 JSON 主体键一致。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    // 地球，数据来自城市级天气服务
    Earth,
    // 火星，数据来自 InSight 着陆器
    Mars,
}

impl Planet {
    /// # Summary
    /// 返回作为主体键使用的小写名称。
    pub fn key(&self) -> &'static str {
        match self {
            Planet::Earth => "earth",
            Planet::Mars => "mars",
        }
    }

    /// # Summary
    /// 返回首字母大写的展示名称，用于图表标题。
    pub fn display_name(&self) -> &'static str {
        match self {
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
        }
    }
}

impl FromStr for Planet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "earth" => Ok(Planet::Earth),
            "mars" => Ok(Planet::Mars),
            _ => Err(format!("Unknown planet: {}", s)),
        }
    }
}

impl std::fmt::Display for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// # Summary
/// 四舍五入到指定小数位。
///
/// # Arguments
/// * `value`: 原始数值。
/// * `places`: 保留的小数位数。
///
/// # Returns
/// 舍入后的数值。
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
