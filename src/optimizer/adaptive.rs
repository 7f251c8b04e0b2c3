use tracing::debug;

use super::constraints::DispatchRequest;
use super::goal::round_cents;
use super::policy::ThresholdPolicy;
use super::types::DispatchPlan;
use crate::domain::{clamp_percent, DispatchStep, ForecastPoint};
use crate::forecast::weather::diurnal_temperature;
use crate::pricing::TariffClock;
use crate::simulation::PvModel;

/// Dispatch steps are hourly.
const STEP_HOURS: f64 = 1.0;

/// Threshold-policy search over a day-ahead load forecast.
///
/// Each candidate of the requested mode is simulated over the whole
/// forecast. The first one meeting the savings target wins; without a
/// target, or when none meets it, the candidate with the strictly greatest
/// savings wins, so ties go to the earlier candidate. Savings are compared
/// to the cent, both against the target and between candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DispatchOptimizer {
    pub pv_model: PvModel,
}

impl DispatchOptimizer {
    pub fn new(pv_model: PvModel) -> Self {
        Self { pv_model }
    }

    pub fn optimize(&self, forecast: &[ForecastPoint], request: &DispatchRequest) -> DispatchPlan {
        let request = request.clamped();
        if forecast.is_empty() {
            return DispatchPlan::empty(request.mode);
        }

        let mut best: Option<DispatchPlan> = None;
        for policy in request.mode.candidates() {
            let mut plan = self.simulate(forecast, &request, *policy);
            debug!(
                mode = %request.mode,
                discharge_threshold = policy.discharge_threshold,
                charge_threshold = policy.charge_threshold,
                savings = plan.savings,
                "simulated dispatch candidate"
            );

            if let Some(target) = request.target_daily_savings {
                if meets_target(plan.savings, target) {
                    plan.target_met = Some(true);
                    return plan;
                }
            }
            if best.as_ref().map_or(true, |b| outsaves(plan.savings, b.savings)) {
                best = Some(plan);
            }
        }

        let mut plan = best.unwrap_or_else(|| DispatchPlan::empty(request.mode));
        plan.target_met = request.target_daily_savings.map(|_| false);
        plan
    }

    /// Run one candidate over the forecast from the initial state of charge.
    fn simulate(
        &self,
        forecast: &[ForecastPoint],
        request: &DispatchRequest,
        policy: ThresholdPolicy,
    ) -> DispatchPlan {
        let dt = STEP_HOURS;
        let capacity = request.capacity_kwh;
        let limit = request.power_limit_kw;
        let soc_min = capacity * clamp_percent(request.soc_min_pct, 100.0) / 100.0;
        let mut soc = capacity * clamp_percent(request.soc_init_pct, 100.0) / 100.0;

        let steps = forecast
            .iter()
            .map(|point| {
                let load_kw = point.predicted_load_kw.max(0.0);
                let temperature_c = point
                    .temperature_c
                    .unwrap_or_else(|| diurnal_temperature(point.timestamp));
                let pv_kw = self
                    .pv_model
                    .estimate(point.timestamp, Some(temperature_c), request.pv_factor);
                let raw_net = load_kw - pv_kw;
                let grid_baseline_kw = raw_net.max(0.0);
                let rate = TariffClock::rate(&point.timestamp);

                let battery_kw = if rate >= policy.discharge_threshold
                    && grid_baseline_kw > 0.0
                    && soc > soc_min
                {
                    let discharge = grid_baseline_kw
                        .min(limit)
                        .min(soc / dt)
                        .min((soc - soc_min) / dt);
                    soc = (soc - discharge * dt).max(soc_min);
                    discharge
                } else if rate <= policy.charge_threshold
                    && soc < capacity
                    && request.mode.allows_grid_charging()
                {
                    let charge = limit.min((capacity - soc) / dt);
                    soc = (soc + charge * dt).min(capacity);
                    -charge
                } else if raw_net < 0.0 && soc < capacity {
                    let charge = (-raw_net).min(limit).min((capacity - soc) / dt);
                    soc = (soc + charge * dt).min(capacity);
                    -charge
                } else {
                    0.0
                };

                DispatchStep {
                    timestamp: point.timestamp,
                    load_kw,
                    pv_kw,
                    grid_baseline_kw,
                    battery_kw,
                    grid_optimized_kw: (raw_net - battery_kw).max(0.0),
                    tariff_rate: rate,
                    soc_pct: (100.0 * soc / capacity).round().clamp(0.0, 100.0) as u8,
                }
            })
            .collect();

        DispatchPlan::from_steps(request.mode, policy, steps)
    }
}

fn meets_target(savings: f64, target: f64) -> bool {
    round_cents(savings) >= round_cents(target)
}

fn outsaves(savings: f64, best: f64) -> bool {
    round_cents(savings) > round_cents(best)
}
