//! # `orbitdeck-dashboard` - 仪表盘服务
//!
//! 组合三个数据提供者的输出，生成展示层消费的仪表盘快照，并汇总额度告警。

pub mod service;
pub mod warnings;
