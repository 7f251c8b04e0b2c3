//! # Live Stream
//!
//! Per-connection state for a live load feed. Every accepted reading is
//! appended to a bounded history, stepped through the stream's own battery
//! and summarized as KPIs and alerts over the trailing day.
//!
//! Streams never share state: each one owns its series and its battery.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{BatteryState, LoadSeries, TimeSeriesPoint};
use crate::monitor::{compute_alerts, Alert, LoadKpis};
use crate::optimizer::DispatchRequest;
use crate::simulation::{EquipmentSnapshot, LiveBattery, PvModel, SyntheticLoadGenerator};

/// About 7 days of one-minute readings
pub const LIVE_RETENTION_POINTS: usize = 7 * 24 * 60;

/// What one accepted reading produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveTick {
    pub point: TimeSeriesPoint,
    pub kpis: LoadKpis,
    pub equipment: EquipmentSnapshot,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone)]
pub struct LiveStream {
    series: LoadSeries,
    battery: LiveBattery,
}

impl LiveStream {
    /// Start a stream on top of `history`. The battery's first step runs
    /// from the last history reading.
    pub fn new(history: LoadSeries, battery: BatteryState, pv_model: PvModel, pv_factor: f64) -> Self {
        let last = history.last().map(|p| p.timestamp);
        let mut series = history;
        series.retain_last(LIVE_RETENTION_POINTS);

        Self {
            series,
            battery: LiveBattery::new(battery, pv_model, pv_factor).resume_after(last),
        }
    }

    /// Battery and PV settings taken from a (clamped) dispatch request.
    pub fn from_request(history: LoadSeries, request: &DispatchRequest, pv_model: PvModel) -> Self {
        let request = request.clamped();
        let battery = BatteryState::new(request.capacity_kwh, request.power_limit_kw, request.soc_init_pct);
        Self::new(history, battery, pv_model, request.pv_factor)
    }

    pub fn series(&self) -> &LoadSeries {
        &self.series
    }

    pub fn battery(&self) -> &BatteryState {
        self.battery.state()
    }

    /// Feed one reading.
    ///
    /// Readings that do not move the stream forward (non-finite load, or a
    /// timestamp at or before the newest one) are skipped and yield `None`.
    pub fn tick(&mut self, point: TimeSeriesPoint) -> Option<LiveTick> {
        if !point.consumption_kw.is_finite() {
            warn!(timestamp = %point.timestamp, "skipping live reading without a usable load");
            return None;
        }
        if let Some(last) = self.series.last() {
            if point.timestamp <= last.timestamp {
                warn!(
                    timestamp = %point.timestamp,
                    newest = %last.timestamp,
                    "skipping stale live reading"
                );
                return None;
            }
        }

        self.series.push(point);
        self.series.retain_last(LIVE_RETENTION_POINTS);
        // The stored reading has its load clamped and temperature filled in
        let point = self.series.last().copied()?;

        let equipment = self.battery.tick(&point);
        let kpis = LoadKpis::compute(&self.series);
        let alerts = compute_alerts(&kpis, &equipment);

        debug!(
            timestamp = %point.timestamp,
            load_kw = point.consumption_kw,
            soc_pct = equipment.soc_pct,
            alerts = alerts.len(),
            "live tick"
        );

        Some(LiveTick {
            point,
            kpis,
            equipment,
            alerts,
        })
    }

    /// Feed the generator's next simulated reading. `None` until the stream
    /// has at least one reading to continue from.
    pub fn tick_simulated(&mut self, generator: &mut SyntheticLoadGenerator) -> Option<LiveTick> {
        let next = generator.next_point(self.series.last()?);
        self.tick(next)
    }
}
