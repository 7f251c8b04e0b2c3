use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use home_energy_planner::{config, forecast, planner, simulation, telemetry};
use config::Config;
use forecast::{train_best, RecursiveForecaster};
use planner::{EnergyPlanner, PlanRequest};
use simulation::{PvModel, SyntheticLoadGenerator};
use telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    info!(mode = %cfg.dispatch.mode, days = cfg.synthetic.days, "starting home energy planner");

    let now = Local::now().naive_local();
    let end = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .context("could not truncate current time to the hour")?;
    let history = SyntheticLoadGenerator::new(cfg.synthetic).hourly_series(end);

    let model = train_best(&history, cfg.forecast.n_lags, cfg.forecast.ridge_alpha);
    match &model.metrics {
        Some(metrics) => info!(model = model.predictor.name(), %metrics, "model selected"),
        None => info!(model = model.predictor.name(), "model selected without holdout"),
    }

    let planner = EnergyPlanner::new(
        RecursiveForecaster::new(cfg.forecast.horizon_hours, cfg.forecast.n_lags),
        PvModel::default(),
        cfg.forecast.band_k,
    );
    let request = PlanRequest {
        dispatch: cfg.dispatch_request(),
        goal: cfg.dispatch.goal.clone(),
    };
    let report = planner.plan(&history, &model, None, &request);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
