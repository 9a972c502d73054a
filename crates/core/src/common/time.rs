use chrono::{DateTime, Utc};

/// # Summary
/// 时钟端口。
///
/// # Invariants
/// - 观测时间戳、"最近 N 天"的日期序列与新闻检索起点都从这里取当前时间，
///   Provider 内部不直接读取系统时钟。
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// # Summary
/// 停在固定时刻的时钟，用于让历史日期与兜底时间戳可预测。
#[derive(Debug, Clone, Copy)]
pub struct FakeClockProvider {
    at: DateTime<Utc>,
}

impl FakeClockProvider {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl TimeProvider for FakeClockProvider {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fake_clock_is_frozen() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let clock = FakeClockProvider::new(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }
}
