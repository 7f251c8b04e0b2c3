//! # Synthetic Household Load
//!
//! Hourly load series with a diurnal base profile, a small temperature term
//! and Gaussian noise. Used to give the planner something to work with when
//! no real history is available, and to drive simulated live streams.

use chrono::{Duration, NaiveDateTime, Timelike};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::domain::{LoadSeries, TimeSeriesPoint};
use crate::forecast::weather::diurnal_temperature;

/// Lowest load the generator will emit (kW)
const MIN_LOAD_KW: f64 = 0.2;
/// Noise on one-minute live ticks (kW)
const LIVE_NOISE_STD_KW: f64 = 0.05;

/// Synthetic series configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyntheticLoadConfig {
    /// Days of hourly history to generate
    pub days: u32,
    /// Multiplier applied to the whole profile (0.5-1.5)
    pub load_factor: f64,
    /// Standard deviation of the hourly noise (kW)
    pub noise_std_kw: f64,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for SyntheticLoadConfig {
    fn default() -> Self {
        Self {
            days: 14,
            load_factor: 1.0,
            noise_std_kw: 0.08,
            seed: None,
        }
    }
}

pub struct SyntheticLoadGenerator {
    config: SyntheticLoadConfig,
    rng: StdRng,
}

impl SyntheticLoadGenerator {
    pub fn new(config: SyntheticLoadConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// `days × 24` hourly points ending at `end`.
    pub fn hourly_series(&mut self, end: NaiveDateTime) -> LoadSeries {
        let periods = i64::from(self.config.days) * 24;
        let noise = normal(self.config.noise_std_kw);

        let points: Vec<TimeSeriesPoint> = (0..periods)
            .map(|i| {
                let ts = end - Duration::hours(periods - 1 - i);
                let n = self.sample(noise.as_ref());
                self.point(ts, n)
            })
            .collect();

        LoadSeries::new(points)
    }

    /// Next simulated live reading, one minute after `last`.
    pub fn next_point(&mut self, last: &TimeSeriesPoint) -> TimeSeriesPoint {
        let ts = last.timestamp + Duration::minutes(1);
        let n = self.sample(normal(LIVE_NOISE_STD_KW).as_ref());
        let hour = fractional_hour(ts);
        let temperature_c = diurnal_temperature(ts);
        let base = 2.5 + 0.8 * (1.0 + (2.0 * PI * (hour - 6.0) / 24.0).sin());
        let load = (base + 0.05 * (temperature_c - 24.0) + n) * self.config.load_factor;

        TimeSeriesPoint::new(ts, load.max(MIN_LOAD_KW), temperature_c)
    }

    fn point(&self, ts: NaiveDateTime, noise_kw: f64) -> TimeSeriesPoint {
        let hour = fractional_hour(ts);
        let temperature_c = diurnal_temperature(ts);
        let base = 2.5
            + 0.8 * (1.0 + (2.0 * PI * (hour - 6.0) / 24.0).sin())
            + 0.2 * (4.0 * PI * hour / 24.0).sin();
        let load = (base + 0.05 * (temperature_c - 24.0) + noise_kw) * self.config.load_factor;

        TimeSeriesPoint::new(ts, load.max(MIN_LOAD_KW), temperature_c)
    }

    fn sample(&mut self, noise: Option<&Normal<f64>>) -> f64 {
        noise.map_or(0.0, |n| n.sample(&mut self.rng))
    }
}

fn normal(std_dev: f64) -> Option<Normal<f64>> {
    if std_dev > 0.0 {
        Normal::new(0.0, std_dev).ok()
    } else {
        None
    }
}

fn fractional_hour(ts: NaiveDateTime) -> f64 {
    ts.hour() as f64 + ts.minute() as f64 / 60.0
}
