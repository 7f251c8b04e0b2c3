//! Temperature inputs for forecasting
//!
//! The forecaster refreshes the temperature feature every step. An external
//! forecast can be plugged in through [`TemperatureSource`]; whenever it has
//! nothing to offer, the diurnal estimate is used instead.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// External temperature forecast keyed by timestamp.
///
/// Implementations must return `None` rather than fail when the forecast is
/// unavailable; network access and timeouts belong to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait TemperatureSource {
    fn temperature_at(&self, ts: NaiveDateTime) -> Option<f64>;
}

/// `24 + 3·sin(2π·(hour − 6)/24)` with a fractional hour.
pub fn diurnal_temperature(ts: NaiveDateTime) -> f64 {
    let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;
    24.0 + 3.0 * (2.0 * PI * (hour - 6.0) / 24.0).sin()
}

/// The diurnal model exposed as a source
#[derive(Debug, Clone, Copy, Default)]
pub struct DiurnalTemperature;

impl TemperatureSource for DiurnalTemperature {
    fn temperature_at(&self, ts: NaiveDateTime) -> Option<f64> {
        Some(diurnal_temperature(ts))
    }
}

/// Temperature forecast point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
}

/// A fetched forecast answering with its entry closest in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticTemperatureForecast {
    pub points: Vec<TemperaturePoint>,
}

impl StaticTemperatureForecast {
    pub fn new(points: Vec<TemperaturePoint>) -> Self {
        Self { points }
    }
}

impl TemperatureSource for StaticTemperatureForecast {
    fn temperature_at(&self, ts: NaiveDateTime) -> Option<f64> {
        self.points
            .iter()
            .min_by_key(|p| (p.timestamp - ts).num_seconds().abs())
            .map(|p| p.temperature_c)
            .filter(|t| t.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_diurnal_temperature() {
        assert!((diurnal_temperature(at(6, 0)) - 24.0).abs() < 1e-12);
        assert!((diurnal_temperature(at(12, 0)) - 27.0).abs() < 1e-12);
        assert!((diurnal_temperature(at(0, 0)) - 21.0).abs() < 1e-12);
        assert!(diurnal_temperature(at(6, 30)) > 24.0);
    }

    #[test]
    fn test_static_forecast_nearest_entry() {
        let forecast = StaticTemperatureForecast::new(vec![
            TemperaturePoint { timestamp: at(10, 0), temperature_c: 15.0 },
            TemperaturePoint { timestamp: at(13, 0), temperature_c: 18.0 },
        ]);

        assert_eq!(forecast.temperature_at(at(11, 0)), Some(15.0));
        assert_eq!(forecast.temperature_at(at(12, 30)), Some(18.0));
        assert_eq!(StaticTemperatureForecast::default().temperature_at(at(1, 0)), None);
    }

    #[test]
    fn test_diurnal_source_always_answers() {
        assert_eq!(DiurnalTemperature.temperature_at(at(12, 0)), Some(diurnal_temperature(at(12, 0))));
    }

    #[test]
    fn test_static_forecast_skips_non_finite() {
        let forecast = StaticTemperatureForecast::new(vec![TemperaturePoint {
            timestamp: at(10, 0),
            temperature_c: f64::NAN,
        }]);
        assert_eq!(forecast.temperature_at(at(10, 0)), None);
    }
}
