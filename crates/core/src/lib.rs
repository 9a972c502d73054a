//! # `orbitdeck-core` - 领域内核
//!
//! 定义仪表盘的实体、错误与端口 (Port)。
//! 本 crate 不包含任何网络 I/O，外部数据源与展示层均通过 trait 注入。

pub mod common;
pub mod config;
pub mod layout;

pub mod feed {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod observation {
    pub mod entity;
    pub mod error;
    pub mod port;
}

pub mod chart {
    pub mod entity;
    pub mod error;
    pub mod port;
}
