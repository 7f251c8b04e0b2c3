use chrono::Duration;
use home_energy_planner::config::Config;
use home_energy_planner::forecast::{train_best, RecursiveForecaster};
use home_energy_planner::optimizer::DispatchMode;
use home_energy_planner::planner::{EnergyPlanner, PlanRequest};
use home_energy_planner::simulation::{PvModel, SyntheticLoadConfig, SyntheticLoadGenerator};

use super::midnight;

#[test]
fn test_plan_from_configured_defaults() {
    let config = Config::default();
    let end = midnight() + Duration::days(14) + Duration::hours(15);
    let history = SyntheticLoadGenerator::new(SyntheticLoadConfig {
        seed: Some(7),
        ..config.synthetic
    })
    .hourly_series(end);

    let model = train_best(&history, config.forecast.n_lags, config.forecast.ridge_alpha);
    let planner = EnergyPlanner::new(
        RecursiveForecaster::new(config.forecast.horizon_hours, config.forecast.n_lags),
        PvModel::default(),
        config.forecast.band_k,
    );
    let request = PlanRequest {
        dispatch: config.dispatch_request(),
        goal: Some("economizar 3 por dia".into()),
    };

    let report = planner.plan(&history, &model, None, &request);

    assert_eq!(report.forecast.len(), 24);
    assert_eq!(report.forecast[0].timestamp, end + Duration::hours(1));
    assert_eq!(report.plan.mode, DispatchMode::Normal);
    assert_eq!(report.plan.steps.len(), 24);
    assert!(report.plan.optimized_cost <= report.plan.baseline_cost + 1e-9);
    assert_eq!(report.goal.map(|g| g.daily_target), Some(3.0));
    assert!(report.plan.target_met.is_some());
    assert_eq!(report.daily.len(), 15);
    assert!(report.anomalies.iter().all(|a| a.timestamp >= end - Duration::days(7)));
    for (lower, upper) in report.band.lower_kw.iter().zip(&report.band.upper_kw) {
        assert!(*lower >= 0.0 && lower <= upper);
    }
}
