//! # Planner
//!
//! Runs the whole data flow for one request: history is forecast, the
//! forecast is dispatched against the tariff and priced, and the monitors
//! run on the raw history alongside.

use chrono::Duration;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::{ForecastBand, ForecastPoint, LoadSeries};
use crate::forecast::{ForecastMetrics, RecursiveForecaster, TemperatureSource, TrainedPredictor, DEFAULT_MAE_KW};
use crate::monitor::{
    compute_alerts, compute_drift, daily_profile, detect_anomalies, Alert, AnomalyPoint, DailyLoad,
    DriftReport, LoadKpis,
};
use crate::optimizer::{parse_goal, DispatchOptimizer, DispatchPlan, DispatchRequest, SavingsGoal};
use crate::pricing::{CostAccountant, CostSummary};
use crate::simulation::{EquipmentSimulator, EquipmentSnapshot, PvModel};

/// Anomalies are only reported for this much recent history.
pub const ANOMALY_LOOKBACK_DAYS: i64 = 7;
pub const DEFAULT_BAND_K: f64 = 1.5;

/// One planning request
#[derive(Debug, Clone, Default)]
pub struct PlanRequest {
    pub dispatch: DispatchRequest,
    /// Free-text savings goal; overrides `dispatch.target_daily_savings`
    pub goal: Option<String>,
}

/// Everything the dashboard shows for one request
#[derive(Debug, Clone, Serialize)]
pub struct PlannerReport {
    pub model: String,
    pub metrics: Option<ForecastMetrics>,
    pub forecast: Vec<ForecastPoint>,
    pub band: ForecastBand,
    pub plan: DispatchPlan,
    pub costs: Option<CostSummary>,
    pub equipment: EquipmentSnapshot,
    pub drift: DriftReport,
    pub anomalies: Vec<AnomalyPoint>,
    pub kpis: LoadKpis,
    pub alerts: Vec<Alert>,
    pub daily: Vec<DailyLoad>,
    pub goal: Option<SavingsGoal>,
}

#[derive(Debug, Clone, Copy)]
pub struct EnergyPlanner {
    forecaster: RecursiveForecaster,
    pv_model: PvModel,
    band_k: f64,
}

impl Default for EnergyPlanner {
    fn default() -> Self {
        Self::new(RecursiveForecaster::default(), PvModel::default(), DEFAULT_BAND_K)
    }
}

impl EnergyPlanner {
    pub fn new(forecaster: RecursiveForecaster, pv_model: PvModel, band_k: f64) -> Self {
        Self {
            forecaster,
            pv_model,
            band_k,
        }
    }

    /// Build the full report. Short or empty history degrades to empty
    /// forecasts and "no signal" monitor results, never to an error.
    #[instrument(skip_all, fields(points = history.len(), model = model.predictor.name()))]
    pub fn plan(
        &self,
        history: &LoadSeries,
        model: &TrainedPredictor,
        weather: Option<&dyn TemperatureSource>,
        request: &PlanRequest,
    ) -> PlannerReport {
        let forecast = match self.forecaster.forecast(model.predictor.as_ref(), weather, history) {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "no forecast produced");
                Vec::new()
            }
        };
        let mae = model.metrics.as_ref().map_or(DEFAULT_MAE_KW, |m| m.mae);
        let band = ForecastBand::from_mae(&forecast, mae, self.band_k);

        let goal = request.goal.as_deref().and_then(parse_goal);
        let dispatch = match &goal {
            Some(goal) => request.dispatch.clone().with_goal(Some(goal)),
            None => request.dispatch.clone(),
        }
        .clamped();
        let plan = DispatchOptimizer::new(self.pv_model).optimize(&forecast, &dispatch);

        let kpis = LoadKpis::compute(history);
        let costs = history.last().map(|last| {
            CostAccountant::summarize(last.timestamp, kpis.current_load_kw, &forecast, Some(history))
        });

        let equipment = EquipmentSimulator::new(self.pv_model, dispatch.capacity_kwh).run_over_window(
            history,
            dispatch.pv_factor,
            dispatch.power_limit_kw,
            dispatch.soc_init_pct,
        );

        let recent = match history.last() {
            Some(last) => LoadSeries::new(
                history
                    .since(last.timestamp - Duration::days(ANOMALY_LOOKBACK_DAYS))
                    .iter()
                    .copied(),
            ),
            None => LoadSeries::default(),
        };
        let anomalies = detect_anomalies(&recent);
        let drift = compute_drift(history);
        let alerts = compute_alerts(&kpis, &equipment);

        info!(
            horizon = forecast.len(),
            savings = plan.savings,
            drift = %drift.level,
            anomalies = anomalies.len(),
            alerts = alerts.len(),
            "plan ready"
        );

        PlannerReport {
            model: model.predictor.name().to_string(),
            metrics: model.metrics.clone(),
            forecast,
            band,
            plan,
            costs,
            equipment,
            drift,
            anomalies,
            kpis,
            alerts,
            daily: daily_profile(history),
            goal,
        }
    }
}
