//! # PV / Battery / Grid Equipment Simulation
//!
//! Timestep-aware battery state machine. Each step the battery covers the
//! deficit between load and PV, or absorbs the PV surplus, limited by both
//! the power rating and the energy available (or free) within the step.
//! Deriving the limit from energy as well as power keeps the state of
//! charge inside `[0, capacity]` for any step length.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::solar::PvModel;
use crate::domain::{
    hours, median_timestep_hours, steps_per_day, BatteryState, BatteryStatus, LoadSeries,
    TimeSeriesPoint, DEFAULT_CAPACITY_KWH,
};

/// Step length assumed for live ticks without a usable previous timestamp.
pub const DEFAULT_LIVE_STEP_HOURS: f64 = 1.0 / 60.0;

/// Advance the battery by one step.
///
/// Returns the new state and the battery power for the step: positive when
/// discharging to the load, negative when charging. A non-positive or
/// non-finite `dt_hours` counts as zero elapsed time.
pub fn step(state: BatteryState, load_kw: f64, pv_kw: f64, dt_hours: f64) -> (BatteryState, f64) {
    let dt = if dt_hours.is_finite() && dt_hours > 0.0 {
        dt_hours
    } else {
        0.0
    };
    let limit = state.power_limit_kw.max(0.0);
    let net = load_kw - pv_kw;

    let mut next = state;
    if net > 0.0 && state.soc_kwh > 0.0 {
        let max_discharge_kw = state.soc_kwh / dt;
        let discharge_kw = net.min(limit).min(max_discharge_kw);
        next.soc_kwh = (state.soc_kwh - discharge_kw * dt).max(0.0);
        (next, discharge_kw)
    } else if net < 0.0 && state.soc_kwh < state.capacity_kwh {
        let max_charge_kw = (state.capacity_kwh - state.soc_kwh) / dt;
        let charge_kw = (-net).min(limit).min(max_charge_kw);
        next.soc_kwh = (state.soc_kwh + charge_kw * dt).min(state.capacity_kwh);
        (next, -charge_kw)
    } else {
        (next, 0.0)
    }
}

/// Physical state of the installation at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSnapshot {
    pub timestamp: Option<NaiveDateTime>,
    pub pv_kw: f64,
    pub load_kw: f64,
    pub battery_kw: f64,
    pub grid_kw: f64,
    pub soc_kwh: f64,
    pub soc_pct: u8,
    pub status: BatteryStatus,
}

impl EquipmentSnapshot {
    fn new(
        timestamp: Option<NaiveDateTime>,
        load_kw: f64,
        pv_kw: f64,
        battery_kw: f64,
        battery: &BatteryState,
    ) -> Self {
        Self {
            timestamp,
            pv_kw,
            load_kw,
            battery_kw,
            grid_kw: (load_kw - pv_kw - battery_kw).max(0.0),
            soc_kwh: battery.soc_kwh,
            soc_pct: battery.soc_percent_rounded(),
            status: BatteryStatus::from_power_kw(battery_kw),
        }
    }

    /// Snapshot with no flows, used when there is no history to replay.
    pub fn idle(battery: &BatteryState) -> Self {
        Self::new(None, 0.0, 0.0, 0.0, battery)
    }
}

/// Replays recent history through the battery model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSimulator {
    pub pv_model: PvModel,
    pub capacity_kwh: f64,
}

impl Default for EquipmentSimulator {
    fn default() -> Self {
        Self {
            pv_model: PvModel::default(),
            capacity_kwh: DEFAULT_CAPACITY_KWH,
        }
    }
}

impl EquipmentSimulator {
    pub fn new(pv_model: PvModel, capacity_kwh: f64) -> Self {
        Self {
            pv_model,
            capacity_kwh,
        }
    }

    /// Step the battery across the trailing ~24h of `series`, returning one
    /// snapshot per replayed point.
    pub fn replay(
        &self,
        series: &LoadSeries,
        pv_factor: f64,
        power_limit_kw: f64,
        soc_init_pct: f64,
    ) -> Vec<EquipmentSnapshot> {
        let dt_hours = median_timestep_hours(series.points());
        let window = series.tail(steps_per_day(dt_hours));
        let mut battery = BatteryState::new(self.capacity_kwh, power_limit_kw, soc_init_pct);

        let snapshots: Vec<EquipmentSnapshot> = window
            .iter()
            .map(|point| {
                let pv_kw = self.pv_model.estimate(
                    point.timestamp,
                    Some(point.temperature_c),
                    pv_factor,
                );
                let (next, battery_kw) = step(battery, point.consumption_kw, pv_kw, dt_hours);
                battery = next;
                EquipmentSnapshot::new(
                    Some(point.timestamp),
                    point.consumption_kw,
                    pv_kw,
                    battery_kw,
                    &battery,
                )
            })
            .collect();

        debug!(
            dt_hours,
            steps = snapshots.len(),
            soc_kwh = battery.soc_kwh,
            "replayed equipment window"
        );
        snapshots
    }

    /// Current physical state: the last step of [`Self::replay`].
    pub fn run_over_window(
        &self,
        series: &LoadSeries,
        pv_factor: f64,
        power_limit_kw: f64,
        soc_init_pct: f64,
    ) -> EquipmentSnapshot {
        self.replay(series, pv_factor, power_limit_kw, soc_init_pct)
            .last()
            .copied()
            .unwrap_or_else(|| {
                EquipmentSnapshot::idle(&BatteryState::new(
                    self.capacity_kwh,
                    power_limit_kw,
                    soc_init_pct,
                ))
            })
    }
}

/// Battery that persists across live ticks of a single stream.
///
/// Each stream owns its own instance; the step length is the gap since the
/// previous tick.
#[derive(Debug, Clone)]
pub struct LiveBattery {
    battery: BatteryState,
    pv_model: PvModel,
    pv_factor: f64,
    last_timestamp: Option<NaiveDateTime>,
}

impl LiveBattery {
    pub fn new(battery: BatteryState, pv_model: PvModel, pv_factor: f64) -> Self {
        Self {
            battery,
            pv_model,
            pv_factor,
            last_timestamp: None,
        }
    }

    /// Continue from a reading already seen, typically the last history
    /// point, so the first tick measures its gap from there.
    pub fn resume_after(mut self, last: Option<NaiveDateTime>) -> Self {
        self.last_timestamp = last;
        self
    }

    pub fn state(&self) -> &BatteryState {
        &self.battery
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.last_timestamp
    }

    pub fn tick(&mut self, point: &TimeSeriesPoint) -> EquipmentSnapshot {
        let dt_hours = self
            .last_timestamp
            .map(|prev| hours(point.timestamp - prev))
            .filter(|dt| dt.is_finite() && *dt > 0.0)
            .unwrap_or(DEFAULT_LIVE_STEP_HOURS);
        self.last_timestamp = Some(point.timestamp);

        let pv_kw = self
            .pv_model
            .estimate(point.timestamp, Some(point.temperature_c), self.pv_factor);
        let (next, battery_kw) = step(self.battery, point.consumption_kw, pv_kw, dt_hours);
        self.battery = next;

        EquipmentSnapshot::new(
            Some(point.timestamp),
            point.consumption_kw,
            pv_kw,
            battery_kw,
            &self.battery,
        )
    }
}
