#![cfg(test)]

mod dispatch;
mod forecasting;
mod monitoring;
mod planning;
mod streaming;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use home_energy_planner::domain::{LoadSeries, TimeSeriesPoint};

pub fn midnight() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Hourly series starting at [`midnight`].
pub fn hourly(values: &[f64]) -> LoadSeries {
    LoadSeries::new(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::new(midnight() + Duration::hours(i as i64), *v, 21.0)),
    )
}
