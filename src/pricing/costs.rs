use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{TariffClock, TariffPeriod};
use crate::domain::{ForecastPoint, LoadSeries, TimeSeriesPoint};

/// Cost split across the three tariff periods
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodBreakdown {
    pub off: f64,
    pub mid: f64,
    pub peak: f64,
}

impl PeriodBreakdown {
    pub fn add(&mut self, period: TariffPeriod, cost: f64) {
        match period {
            TariffPeriod::Off => self.off += cost,
            TariffPeriod::Mid => self.mid += cost,
            TariffPeriod::Peak => self.peak += cost,
        }
    }

    pub fn get(&self, period: TariffPeriod) -> f64 {
        match period {
            TariffPeriod::Off => self.off,
            TariffPeriod::Mid => self.mid,
            TariffPeriod::Peak => self.peak,
        }
    }

    pub fn total(&self) -> f64 {
        self.off + self.mid + self.peak
    }
}

/// Cost KPIs for the current moment, the recent past and the forecast horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub rate_now: f64,
    pub period_now: TariffPeriod,
    pub current_cost: f64,
    pub forecast_cost_24h: f64,
    pub forecast_by_period: PeriodBreakdown,
    /// Cost accumulated since local midnight, if history was supplied
    pub today_cost: Option<f64>,
    /// Cost over the trailing 24 hours, if history was supplied
    pub last24_cost: Option<f64>,
    /// Trailing 24 hour cost per period (zeros without history)
    pub by_period: PeriodBreakdown,
    /// First forecast step falling in the peak period
    pub next_peak: Option<NaiveDateTime>,
}

/// Aggregates tariff costs. Each reading is priced as `kW × rate`, one
/// reading per step, matching how the dashboard reports it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostAccountant;

impl CostAccountant {
    pub fn summarize(
        now: NaiveDateTime,
        current_load_kw: f64,
        forecast: &[ForecastPoint],
        history: Option<&LoadSeries>,
    ) -> CostSummary {
        let period_now = TariffClock::period(&now);
        let rate_now = period_now.rate();

        let mut forecast_by_period = PeriodBreakdown::default();
        let mut next_peak = None;
        for point in forecast {
            let period = TariffClock::period(&point.timestamp);
            forecast_by_period.add(period, point.predicted_load_kw * period.rate());
            if next_peak.is_none() && period == TariffPeriod::Peak {
                next_peak = Some(point.timestamp);
            }
        }

        let mut today_cost = None;
        let mut last24_cost = None;
        let mut by_period = PeriodBreakdown::default();

        if let Some(history) = history.filter(|h| !h.is_empty()) {
            let start_today = now.date().and_time(NaiveTime::MIN);
            let today = history.since(start_today);
            if !today.is_empty() {
                today_cost = Some(today.iter().map(reading_cost).sum());
            }

            let last24 = history.since(now - Duration::hours(24));
            if !last24.is_empty() {
                for point in last24 {
                    by_period.add(TariffClock::period(&point.timestamp), reading_cost(point));
                }
                last24_cost = Some(by_period.total());
            }
        }

        CostSummary {
            rate_now,
            period_now,
            current_cost: current_load_kw.max(0.0) * rate_now,
            forecast_cost_24h: forecast_by_period.total(),
            forecast_by_period,
            today_cost,
            last24_cost,
            by_period,
            next_peak,
        }
    }
}

fn reading_cost(point: &TimeSeriesPoint) -> f64 {
    point.consumption_kw * TariffClock::rate(&point.timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_forecast_costs_by_period() {
        let forecast = vec![
            ForecastPoint::new(at(2, 10), 2.0), // off
            ForecastPoint::new(at(2, 12), 1.0), // mid
            ForecastPoint::new(at(2, 19), 1.0), // peak
            ForecastPoint::new(at(2, 20), 2.0), // peak
        ];

        let summary = CostAccountant::summarize(at(2, 9), 3.0, &forecast, None);

        assert_eq!(summary.rate_now, 0.5);
        assert_eq!(summary.current_cost, 1.5);
        assert!((summary.forecast_by_period.off - 1.0).abs() < 1e-12);
        assert!((summary.forecast_by_period.mid - 0.8).abs() < 1e-12);
        assert!((summary.forecast_by_period.peak - 3.6).abs() < 1e-12);
        assert!((summary.forecast_cost_24h - 5.4).abs() < 1e-12);
        assert_eq!(summary.next_peak, Some(at(2, 19)));
        assert_eq!(summary.today_cost, None);
        assert_eq!(summary.last24_cost, None);
        assert_eq!(summary.by_period, PeriodBreakdown::default());
    }

    #[test]
    fn test_history_costs() {
        // Hourly readings of 1 kW from day 1 00:00 to day 2 12:00
        let history = LoadSeries::new((0..37).map(|h| {
            TimeSeriesPoint::new(at(1, 0) + Duration::hours(h), 1.0, 20.0)
        }));
        let now = at(2, 12);

        let summary = CostAccountant::summarize(now, 1.0, &[], Some(&history));

        // Today: hours 0..=12 -> 11 off hours (0..=10) and 2 mid hours (11, 12)
        let today = summary.today_cost.unwrap();
        assert!((today - (11.0 * 0.5 + 2.0 * 0.8)).abs() < 1e-9);

        // Last 24h: day 1 12:00 ..= day 2 12:00 (25 readings)
        let by = summary.by_period;
        assert!((by.peak - 4.0 * 1.2).abs() < 1e-9);
        assert!((by.mid - 8.0 * 0.8).abs() < 1e-9);
        assert!((by.off - 13.0 * 0.5).abs() < 1e-9);
        assert!((summary.last24_cost.unwrap() - by.total()).abs() < 1e-12);
        assert_eq!(summary.next_peak, None);
    }

    #[test]
    fn test_empty_history_is_none() {
        let summary = CostAccountant::summarize(at(2, 12), 1.0, &[], Some(&LoadSeries::default()));
        assert_eq!(summary.today_cost, None);
        assert_eq!(summary.forecast_cost_24h, 0.0);
    }
}
