use home_energy_planner::monitor::{compute_drift, detect_anomalies, DriftLevel};

use super::hourly;

#[test]
fn test_drift_between_days() {
    let mut values: Vec<f64> = (0..24).map(|i| 10.0 + if i % 2 == 0 { 0.05 } else { -0.05 }).collect();
    values.extend((0..24).map(|i| 15.0 + if i % 2 == 0 { 0.05 } else { -0.05 }));

    let report = compute_drift(&hourly(&values));
    assert_eq!(report.level, DriftLevel::High);
    assert!(report.change_pct > 49.0);
}

#[test]
fn test_one_spike_one_anomaly() {
    let mut values = vec![5.0; 72];
    values[30] = 50.0;
    let series = hourly(&values);

    let anomalies = detect_anomalies(&series);
    assert_eq!(anomalies.len(), 1);
    assert_eq!(anomalies[0].timestamp, series.points()[30].timestamp);
    assert_eq!(anomalies[0].value, 50.0);
}
