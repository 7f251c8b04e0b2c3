use chrono::Duration;
use home_energy_planner::domain::TimeSeriesPoint;
use home_energy_planner::monitor::AlertKind;
use home_energy_planner::optimizer::DispatchRequest;
use home_energy_planner::simulation::{PvModel, SyntheticLoadConfig, SyntheticLoadGenerator};
use home_energy_planner::stream::LiveStream;

use super::midnight;

#[test]
fn test_evening_stream_drains_battery() {
    let mut generator = SyntheticLoadGenerator::new(SyntheticLoadConfig {
        seed: Some(7),
        ..Default::default()
    });
    let end = midnight() + Duration::hours(20);
    let history = generator.hourly_series(end);
    assert_eq!(history.len(), 14 * 24);

    let mut live = LiveStream::from_request(history, &DispatchRequest::default(), PvModel::default());

    // An hour after the history ends: the battery covers 2 kW for the whole hour
    let first = live
        .tick(TimeSeriesPoint::new(end + Duration::hours(1), 3.0, 22.0))
        .expect("reading accepted");
    assert_eq!(first.equipment.battery_kw, 2.0);
    assert!((live.battery().soc_kwh - 3.0).abs() < 1e-9);

    // Another hour of simulated one-minute readings, all above the 2 kW limit
    let ticks: Vec<_> = (0..60)
        .map(|_| live.tick_simulated(&mut generator).expect("simulated reading"))
        .collect();

    for (i, tick) in ticks.iter().enumerate() {
        assert_eq!(tick.point.timestamp, end + Duration::hours(1) + Duration::minutes(i as i64 + 1));
        assert_eq!(tick.equipment.pv_kw, 0.0);
        assert_eq!(tick.kpis.current_load_kw, tick.point.consumption_kw);
    }
    assert_eq!(live.series().len(), 14 * 24 + 61);
    assert!((live.battery().soc_kwh - 1.0).abs() < 1e-9);

    let last = ticks.last().expect("ticks");
    assert_eq!(last.equipment.soc_pct, 10);
    assert!(last.alerts.iter().any(|a| a.kind == AlertKind::LowBattery));

    let json = serde_json::to_value(last).expect("serializable");
    assert_eq!(json["equipment"]["soc_pct"], 10);
}
