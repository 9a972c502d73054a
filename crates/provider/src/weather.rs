use crate::simulate::{random_weather, trailing_dates};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orbitdeck_core::common::random::RandomSource;
use orbitdeck_core::common::time::TimeProvider;
use orbitdeck_core::common::{Planet, round_to};
use orbitdeck_core::feed::entity::{EarthConditions, SolReport};
use orbitdeck_core::feed::error::FetchError;
use orbitdeck_core::feed::port::{EarthWeatherFeed, FeedHandle, MarsWeatherFeed};
use orbitdeck_core::observation::entity::{
    Degradation, HistoricalSeries, Observed, ProviderResult, WeatherDay, WeatherReading,
};
use orbitdeck_core::observation::port::WeatherProvider;
use std::sync::Arc;

/// 模拟地球历史温度区间 (摄氏度)
pub const EARTH_HISTORY_RANGE: (f64, f64) = (15.0, 25.0);
/// 模拟火星历史温度区间 (摄氏度)
pub const MARS_HISTORY_RANGE: (f64, f64) = (-80.0, -40.0);

const EARTH_CONDITIONS: [&str; 3] = ["Sunny", "Partly Cloudy", "Clear"];
const MARS_CONDITIONS: [&str; 3] = ["Dusty", "Clear", "Dust Storm"];

/// # Summary
/// 华氏度转摄氏度。
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// # Summary
/// 计算火星日的代表温度：平均、最低、最高三个读数取均值后换算为摄氏度，保留一位小数。
pub fn sol_temperature_c(report: &SolReport) -> f64 {
    let mean_f = (report.temp_avg_f + report.temp_min_f + report.temp_max_f) / 3.0;
    round_to(fahrenheit_to_celsius(mean_f), 1)
}

/// # Summary
/// 根据风速给火星日打上天气状况标签。
///
/// # Logic
/// 1. 风速 ≥ 40 km/h 为 "Dust Storm"。
/// 2. 风速 ≥ 25 km/h 为 "Dusty"。
/// 3. 其余 (含无风速数据) 为 "Clear"。
pub fn mars_condition(wind_speed_kmh: Option<f64>) -> &'static str {
    match wind_speed_kmh {
        Some(w) if w >= 40.0 => "Dust Storm",
        Some(w) if w >= 25.0 => "Dusty",
        _ => "Clear",
    }
}

/// 地球兜底天气：20°C, Sunny, 湿度 65, 风速 10
pub fn earth_fallback(now: DateTime<Utc>) -> WeatherReading {
    WeatherReading {
        temperature: 20.0,
        condition: "Sunny".to_string(),
        humidity: 65.0,
        wind_speed: 10.0,
        pressure: None,
        sol: None,
        timestamp: now,
    }
}

/// 火星兜底天气：-63°C, Clear, 湿度 0, 风速 30
pub fn mars_fallback(now: DateTime<Utc>) -> WeatherReading {
    WeatherReading {
        temperature: -63.0,
        condition: "Clear".to_string(),
        humidity: 0.0,
        wind_speed: 30.0,
        pressure: None,
        sol: None,
        timestamp: now,
    }
}

fn earth_reading(conditions: EarthConditions) -> WeatherReading {
    WeatherReading {
        temperature: conditions.temperature_c,
        condition: conditions.condition,
        humidity: conditions.humidity,
        wind_speed: conditions.wind_speed_kmh,
        pressure: conditions.pressure_hpa,
        sol: None,
        timestamp: conditions.observed_at,
    }
}

fn mars_reading(report: &SolReport, now: DateTime<Utc>) -> WeatherReading {
    WeatherReading {
        temperature: sol_temperature_c(report),
        condition: mars_condition(report.wind_speed_kmh).to_string(),
        humidity: 0.0,
        wind_speed: report.wind_speed_kmh.unwrap_or(0.0),
        pressure: report.pressure_pa,
        sol: Some(report.sol),
        timestamp: report.last_utc.unwrap_or(now),
    }
}

/// # Summary
/// 地球/火星天气提供者。
///
/// # Invariants
/// - 当前天气结果总是同时包含 `earth` 与 `mars`。
/// - 地球历史数据总是模拟数据。
pub struct WeatherService {
    earth: FeedHandle<dyn EarthWeatherFeed>,
    mars: FeedHandle<dyn MarsWeatherFeed>,
    city: String,
    clock: Arc<dyn TimeProvider>,
    random: Arc<dyn RandomSource>,
}

impl WeatherService {
    /// # Summary
    /// 创建天气提供者。
    ///
    /// # Arguments
    /// * `earth`: 地球天气数据源句柄。
    /// * `mars`: 火星天气数据源句柄。
    /// * `city`: 地球天气查询的城市。
    /// * `clock`: 时钟。
    /// * `random`: 模拟数据使用的随机源。
    pub fn new(
        earth: FeedHandle<dyn EarthWeatherFeed>,
        mars: FeedHandle<dyn MarsWeatherFeed>,
        city: impl Into<String>,
        clock: Arc<dyn TimeProvider>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            earth,
            mars,
            city: city.into(),
            clock,
            random,
        }
    }

    async fn earth_current(&self) -> Observed<WeatherReading> {
        let result = match &self.earth {
            Ok(feed) => feed.current(&self.city).await,
            Err(err) => Err(err.clone()),
        };
        match result {
            Ok(conditions) => Observed::live(earth_reading(conditions)),
            Err(err) => {
                tracing::warn!(planet = "earth", error = %err, "Earth weather unavailable, serving fallback");
                Observed::fallback(earth_fallback(self.clock.now()), err.degradation())
            }
        }
    }

    async fn mars_current(&self) -> Observed<WeatherReading> {
        let now = self.clock.now();
        match self.latest_sols().await {
            Ok(sols) => match sols.last() {
                Some(latest) => Observed::live(mars_reading(latest, now)),
                None => Observed::fallback(mars_fallback(now), Degradation::NoData),
            },
            Err(err) => {
                tracing::warn!(planet = "mars", error = %err, "Mars weather unavailable, serving fallback");
                Observed::fallback(mars_fallback(now), err.degradation())
            }
        }
    }

    async fn latest_sols(&self) -> Result<Vec<SolReport>, FetchError> {
        let feed = self.mars.as_ref().map_err(Clone::clone)?;
        feed.latest_sols().await
    }

    /// # Summary
    /// 从火星日数据构建历史序列。
    ///
    /// # Logic
    /// 1. 取最近 `days` 个火星日。
    /// 2. 最新的火星日对应今天，其余按顺序向前逐日映射为日历日期。
    async fn mars_history(&self, days: usize) -> Result<Vec<WeatherDay>, FetchError> {
        let sols = self.latest_sols().await?;
        let recent = &sols[sols.len().saturating_sub(days)..];
        if recent.is_empty() {
            return Err(FetchError::Empty);
        }

        let dates = trailing_dates(self.clock.now().date_naive(), recent.len());
        Ok(recent
            .iter()
            .zip(dates)
            .map(|(report, date)| WeatherDay {
                date,
                temperature: sol_temperature_c(report),
                condition: mars_condition(report.wind_speed_kmh).to_string(),
                sol: Some(report.sol),
            })
            .collect())
    }

    fn simulated_history(&self, planet: Planet, days: usize) -> Vec<WeatherDay> {
        let dates = trailing_dates(self.clock.now().date_naive(), days);
        let (range, conditions) = match planet {
            Planet::Earth => (EARTH_HISTORY_RANGE, &EARTH_CONDITIONS),
            Planet::Mars => (MARS_HISTORY_RANGE, &MARS_CONDITIONS),
        };
        random_weather(range, conditions, &dates, self.random.as_ref())
    }
}

fn series(planet: Planet, points: Vec<WeatherDay>) -> HistoricalSeries<WeatherDay> {
    HistoricalSeries {
        subject: planet.key().to_string(),
        label: planet.display_name().to_string(),
        points,
    }
}

#[async_trait]
impl WeatherProvider for WeatherService {
    /// # Summary
    /// 依次获取地球与火星的当前天气。
    ///
    /// # Logic
    /// 1. 地球与火星各自独立调用，任意一方失败只影响自身。
    /// 2. 失败方替换为固定兜底数据并附带说明。
    async fn fetch_current(&self) -> ProviderResult<WeatherReading> {
        let mut result = ProviderResult::new();
        result.insert(Planet::Earth.key(), self.earth_current().await);
        result.insert(Planet::Mars.key(), self.mars_current().await);
        result
    }

    /// # Summary
    /// 获取行星温度历史。
    ///
    /// # Logic
    /// 1. 地球：不调用外部服务，直接生成 15~25°C 的模拟数据。
    /// 2. 火星：映射最近的火星日；任何失败都回退为 -80~-40°C 的模拟数据。
    async fn fetch_historical(
        &self,
        planet: Planet,
        days: usize,
    ) -> Observed<HistoricalSeries<WeatherDay>> {
        let days = days.max(1);
        match planet {
            Planet::Earth => Observed::simulated(
                series(planet, self.simulated_history(planet, days)),
                Degradation::NotSupported,
            ),
            Planet::Mars => match self.mars_history(days).await {
                Ok(points) => Observed::live(series(planet, points)),
                Err(err) => {
                    tracing::warn!(planet = "mars", error = %err, "Mars history unavailable, serving simulated data");
                    Observed::simulated(
                        series(planet, self.simulated_history(planet, days)),
                        err.degradation(),
                    )
                }
            },
        }
    }
}
