//! Headline load figures, threshold alerts and the per-day load profile.

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::stats::mean;
use crate::domain::LoadSeries;
use crate::simulation::EquipmentSnapshot;

const LOW_SOC_PCT: u8 = 15;
const HIGH_LOAD_RATIO: f64 = 1.2;
const NEAR_PEAK_RATIO: f64 = 0.95;
const HIGH_GRID_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadKpis {
    pub last_updated: Option<NaiveDateTime>,
    pub current_load_kw: f64,
    /// Mean over the trailing day of readings
    pub avg_24h_kw: Option<f64>,
    pub peak_24h_kw: Option<f64>,
    pub current_temp_c: Option<f64>,
}

impl LoadKpis {
    pub fn compute(series: &LoadSeries) -> Self {
        let Some(last) = series.last() else {
            return Self::default();
        };
        let window: Vec<f64> = series
            .tail(series.steps_per_day())
            .iter()
            .map(|p| p.consumption_kw)
            .collect();

        Self {
            last_updated: Some(last.timestamp),
            current_load_kw: last.consumption_kw,
            avg_24h_kw: Some(mean(&window)),
            peak_24h_kw: window.iter().copied().reduce(f64::max),
            current_temp_c: Some(last.temperature_c),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warn,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertKind {
    LowBattery,
    HighLoad,
    NearPeak,
    HighGridUse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    fn new(level: AlertLevel, kind: AlertKind, message: String) -> Self {
        Self {
            level,
            kind,
            message,
        }
    }
}

/// Threshold alerts on the current load and equipment state.
pub fn compute_alerts(kpis: &LoadKpis, equipment: &EquipmentSnapshot) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let load = kpis.current_load_kw;

    if equipment.soc_pct < LOW_SOC_PCT {
        alerts.push(Alert::new(
            AlertLevel::Warn,
            AlertKind::LowBattery,
            format!("Battery low: SOC {}%", equipment.soc_pct),
        ));
    }
    if let Some(avg) = kpis.avg_24h_kw {
        if load > avg * HIGH_LOAD_RATIO {
            alerts.push(Alert::new(
                AlertLevel::Info,
                AlertKind::HighLoad,
                format!("Load high against the 24h mean ({load:.2} kW)"),
            ));
        }
    }
    if let Some(peak) = kpis.peak_24h_kw {
        if load >= peak * NEAR_PEAK_RATIO {
            alerts.push(Alert::new(
                AlertLevel::Warn,
                AlertKind::NearPeak,
                "Close to the 24h peak".to_string(),
            ));
        }
    }
    // Without a mean the grid draw is compared with itself
    let grid = equipment.grid_kw;
    if grid > kpis.avg_24h_kw.unwrap_or(grid) * HIGH_GRID_RATIO {
        alerts.push(Alert::new(
            AlertLevel::Info,
            AlertKind::HighGridUse,
            format!("High grid use ({grid:.2} kW)"),
        ));
    }

    alerts
}

/// Mean and maximum load of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    pub mean_kw: f64,
    pub max_kw: f64,
}

pub fn daily_profile(series: &LoadSeries) -> Vec<DailyLoad> {
    series
        .points()
        .iter()
        .chunk_by(|p| p.timestamp.date())
        .into_iter()
        .map(|(date, group)| {
            let values: Vec<f64> = group.map(|p| p.consumption_kw).collect();
            DailyLoad {
                date,
                mean_kw: mean(&values),
                max_kw: values.iter().copied().fold(0.0, f64::max),
            }
        })
        .collect()
}
