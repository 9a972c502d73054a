use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// # Summary
/// 随机数供给器接口，模拟数据的所有扰动都从这里取值。
///
/// # Invariants
/// - `uniform` 的返回值必须落在闭区间 `[low, high]` 内。
/// - `pick` 的返回值必须小于 `len` (当 `len > 0`)。
pub trait RandomSource: Send + Sync {
    /// 在闭区间 `[low, high]` 内均匀取值
    fn uniform(&self, low: f64, high: f64) -> f64;

    /// 在 `[0, len)` 内均匀取一个下标，`len == 0` 时返回 0
    fn pick(&self, len: usize) -> usize;
}

/// # Summary
/// 基于线程本地 RNG 的生产随机源。
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        rand::thread_rng().gen_range(low..=high)
    }

    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// # Summary
/// 可复现的带种子随机源，测试中用于遍历大量种子。
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// 使用给定种子创建随机源
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut guard = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.with_rng(|rng| rng.gen_range(low..=high))
    }

    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.with_rng(|rng| rng.gen_range(0..len))
    }
}

/// # Summary
/// 固定值随机源：`uniform` 总是返回被夹到区间内的固定值，`pick` 总是返回 0。
/// 用于钉住扰动 (例如强制漂移为 0)。
pub struct FixedRandom {
    value: f64,
}

impl FixedRandom {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl RandomSource for FixedRandom {
    fn uniform(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.value.clamp(low, high)
    }

    fn pick(&self, _len: usize) -> usize {
        0
    }
}
