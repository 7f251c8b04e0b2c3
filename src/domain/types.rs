use chrono::{Duration, NaiveDateTime};
use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::forecast::diurnal_temperature;

/// Timestep assumed when a series is too short or irregular to infer one.
pub const DEFAULT_TIMESTEP_HOURS: f64 = 1.0;

/// One historical reading of household load and ambient temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub consumption_kw: f64,
    pub temperature_c: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: NaiveDateTime, consumption_kw: f64, temperature_c: f64) -> Self {
        Self {
            timestamp,
            consumption_kw,
            temperature_c,
        }
    }
}

/// Ordered, timestamp-unique load history.
///
/// Construction sorts ascending, drops readings with non-finite consumption
/// and keeps the most recently supplied reading when timestamps collide.
/// Negative consumption is clamped to zero. A non-finite temperature is
/// replaced by the diurnal estimate for that timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadSeries {
    points: Vec<TimeSeriesPoint>,
}

impl LoadSeries {
    pub fn new(points: impl IntoIterator<Item = TimeSeriesPoint>) -> Self {
        let mut points: Vec<TimeSeriesPoint> = points
            .into_iter()
            .filter(|p| p.consumption_kw.is_finite())
            .map(|p| TimeSeriesPoint {
                consumption_kw: p.consumption_kw.max(0.0),
                temperature_c: if p.temperature_c.is_finite() {
                    p.temperature_c
                } else {
                    diurnal_temperature(p.timestamp)
                },
                ..p
            })
            .collect();

        // Stable sort, then dedup from the back so the last reading wins.
        points.sort_by_key(|p| p.timestamp);
        points.reverse();
        points.dedup_by_key(|p| p.timestamp);
        points.reverse();

        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TimeSeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// The trailing `n` points (all of them if the series is shorter).
    pub fn tail(&self, n: usize) -> &[TimeSeriesPoint] {
        &self.points[self.points.len().saturating_sub(n)..]
    }

    /// Points with `timestamp >= start`.
    pub fn since(&self, start: NaiveDateTime) -> &[TimeSeriesPoint] {
        let idx = self.points.partition_point(|p| p.timestamp < start);
        &self.points[idx..]
    }

    pub fn consumption(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.consumption_kw).collect()
    }

    /// Appends a reading, keeping the series ordered and unique.
    pub fn push(&mut self, point: TimeSeriesPoint) {
        match self.points.last() {
            Some(last) if point.timestamp <= last.timestamp => {
                let mut points = std::mem::take(&mut self.points);
                points.push(point);
                *self = Self::new(points);
            }
            _ => {
                if let Some(p) = Self::new([point]).points.pop() {
                    self.points.push(p);
                }
            }
        }
    }

    /// Drops everything but the trailing `n` points.
    pub fn retain_last(&mut self, n: usize) {
        let skip = self.points.len().saturating_sub(n);
        self.points.drain(..skip);
    }

    /// Median spacing between consecutive points, in hours.
    pub fn timestep_hours(&self) -> f64 {
        median_timestep_hours(&self.points)
    }

    /// Number of samples covering roughly one day at the inferred timestep.
    pub fn steps_per_day(&self) -> usize {
        steps_per_day(self.timestep_hours())
    }
}

impl From<Vec<TimeSeriesPoint>> for LoadSeries {
    fn from(points: Vec<TimeSeriesPoint>) -> Self {
        Self::new(points)
    }
}

/// Median timestamp delta in hours, falling back to one hour when there
/// are fewer than two points or the median is not positive.
pub fn median_timestep_hours(points: &[TimeSeriesPoint]) -> f64 {
    let deltas: Vec<f64> = points
        .iter()
        .tuple_windows()
        .map(|(a, b)| hours(b.timestamp - a.timestamp))
        .sorted_by_key(|d| OrderedFloat(*d))
        .collect();

    if deltas.is_empty() {
        return DEFAULT_TIMESTEP_HOURS;
    }

    let mid = deltas.len() / 2;
    let median = if deltas.len() % 2 == 0 {
        (deltas[mid - 1] + deltas[mid]) / 2.0
    } else {
        deltas[mid]
    };

    if median.is_finite() && median > 0.0 {
        median
    } else {
        DEFAULT_TIMESTEP_HOURS
    }
}

/// `round(24 / dt)`, never below one sample.
pub fn steps_per_day(dt_hours: f64) -> usize {
    let steps = (24.0 / dt_hours).round();
    if steps.is_finite() && steps >= 1.0 {
        steps as usize
    } else {
        1
    }
}

/// Converts a chrono duration into fractional hours.
pub fn hours(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_series_sorted_and_deduplicated() {
        let series = LoadSeries::new(vec![
            TimeSeriesPoint::new(ts(2, 0), 2.0, 20.0),
            TimeSeriesPoint::new(ts(1, 0), 1.0, 20.0),
            TimeSeriesPoint::new(ts(2, 0), 5.0, 21.0),
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].timestamp, ts(1, 0));
        assert_eq!(series.points()[1].consumption_kw, 5.0);
    }

    #[test]
    fn test_series_drops_non_finite_and_clamps_negative() {
        let series = LoadSeries::new(vec![
            TimeSeriesPoint::new(ts(1, 0), f64::NAN, 20.0),
            TimeSeriesPoint::new(ts(2, 0), -3.0, 20.0),
        ]);

        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].consumption_kw, 0.0);
    }

    #[test]
    fn test_series_fills_missing_temperature() {
        let mut series = LoadSeries::new(vec![TimeSeriesPoint::new(ts(6, 0), 1.2, f64::NAN)]);
        series.push(TimeSeriesPoint::new(ts(12, 0), 0.8, f64::INFINITY));

        assert_eq!(series.consumption(), vec![1.2, 0.8]);
        // 24 + 3·sin(0) and 24 + 3·sin(π/2)
        assert!((series.points()[0].temperature_c - 24.0).abs() < 1e-9);
        assert!((series.points()[1].temperature_c - 27.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_timestep() {
        let series = LoadSeries::new(vec![
            TimeSeriesPoint::new(ts(0, 0), 1.0, 20.0),
            TimeSeriesPoint::new(ts(0, 15), 1.0, 20.0),
            TimeSeriesPoint::new(ts(0, 30), 1.0, 20.0),
            TimeSeriesPoint::new(ts(3, 0), 1.0, 20.0),
        ]);

        assert!((series.timestep_hours() - 0.25).abs() < 1e-12);
        assert_eq!(series.steps_per_day(), 96);
    }

    #[test]
    fn test_timestep_defaults_to_one_hour() {
        let single = LoadSeries::new(vec![TimeSeriesPoint::new(ts(0, 0), 1.0, 20.0)]);
        assert_eq!(single.timestep_hours(), DEFAULT_TIMESTEP_HOURS);
        assert_eq!(LoadSeries::default().steps_per_day(), 24);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut series = LoadSeries::new(vec![TimeSeriesPoint::new(ts(2, 0), 2.0, 20.0)]);
        series.push(TimeSeriesPoint::new(ts(3, 0), 3.0, 20.0));
        series.push(TimeSeriesPoint::new(ts(1, 0), 1.0, 20.0));

        let loads: Vec<f64> = series.consumption();
        assert_eq!(loads, vec![1.0, 2.0, 3.0]);

        series.retain_last(2);
        assert_eq!(series.consumption(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_since() {
        let series = LoadSeries::new((0..5).map(|h| TimeSeriesPoint::new(ts(h, 0), h as f64, 20.0)));
        assert_eq!(series.since(ts(3, 0)).len(), 2);
        assert_eq!(series.tail(10).len(), 5);
    }
}
