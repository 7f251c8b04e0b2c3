use chrono::Duration;
use home_energy_planner::forecast::{
    train_best, FeatureBuilder, RecursiveForecaster, SeasonalNaive, StaticTemperatureForecast,
    TemperaturePoint, DEFAULT_RIDGE_ALPHA,
};
use home_energy_planner::simulation::{SyntheticLoadConfig, SyntheticLoadGenerator};

use super::{hourly, midnight};

#[test]
fn test_feature_rows_for_100_points() {
    let values: Vec<f64> = (0..100).map(|i| 1.0 + (i % 24) as f64 * 0.1).collect();
    let series = hourly(&values);
    let rows = FeatureBuilder::default().build(series.points());

    assert_eq!(rows.len(), 76);
    for (row, i) in rows.iter().zip(24..) {
        assert_eq!(row.features.lag(1), Some(values[i - 1]));
        assert_eq!(row.features.lag(24), Some(values[i - 24]));
        assert_eq!(row.target_kw, values[i]);
    }
}

#[test]
fn test_forecast_on_synthetic_history() {
    let end = midnight() + Duration::days(14);
    let history = SyntheticLoadGenerator::new(SyntheticLoadConfig {
        seed: Some(11),
        ..Default::default()
    })
    .hourly_series(end);

    let model = train_best(&history, 24, DEFAULT_RIDGE_ALPHA);
    let metrics = model.metrics.as_ref().expect("14 days leave a holdout");
    assert_eq!(metrics.sample_count, 72);
    assert!(metrics.mae.is_finite());

    let forecast = RecursiveForecaster::default()
        .forecast(model.predictor.as_ref(), None, &history)
        .unwrap();
    assert_eq!(forecast.len(), 24);
    assert_eq!(forecast[0].timestamp, end + Duration::hours(1));
    assert!(forecast.iter().all(|p| p.predicted_load_kw >= 0.0));
}

#[test]
fn test_external_temperature_reaches_forecast() {
    let history = hourly(&[2.0; 48]);
    let last = history.last().unwrap().timestamp;
    let weather = StaticTemperatureForecast::new(
        (1..=24)
            .map(|h| TemperaturePoint {
                timestamp: last + Duration::hours(h),
                temperature_c: 5.0,
            })
            .collect(),
    );

    let forecast = RecursiveForecaster::default()
        .forecast(&SeasonalNaive::default(), Some(&weather), &history)
        .unwrap();
    assert!(forecast.iter().all(|p| p.temperature_c == Some(5.0)));
    assert!(forecast.iter().all(|p| p.predicted_load_kw == 2.0));
}
