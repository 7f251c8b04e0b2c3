use chrono::Duration;
use home_energy_planner::domain::{BatteryStatus, ForecastPoint};
use home_energy_planner::optimizer::{parse_goal, DispatchMode, DispatchOptimizer, DispatchRequest};
use home_energy_planner::pricing::{CostAccountant, TariffClock, TariffPeriod};

use super::{hourly, midnight};

fn day_ahead(load_kw: f64) -> Vec<ForecastPoint> {
    (0..24)
        .map(|h| ForecastPoint::new(midnight() + Duration::hours(h), load_kw))
        .collect()
}

#[test]
fn test_tariff_examples() {
    let at = |h: i64| midnight() + Duration::hours(h);
    assert_eq!(TariffClock::rate(&at(19)), 1.2);
    assert_eq!(TariffClock::rate(&at(14)), 0.8);
    assert_eq!(TariffClock::rate(&at(2)), 0.5);
    assert_eq!(TariffClock::period(&at(18)), TariffPeriod::Peak);
    assert_eq!(TariffClock::period(&at(21)), TariffPeriod::Peak);
    assert_eq!(TariffClock::period(&at(11)), TariffPeriod::Mid);
    assert_eq!(TariffClock::period(&at(17)), TariffPeriod::Mid);
}

#[test]
fn test_peak_discharge_lowers_cost() {
    let request = DispatchRequest {
        soc_init_pct: 80.0,
        soc_min_pct: 20.0,
        ..Default::default()
    };
    let plan = DispatchOptimizer::default().optimize(&day_ahead(2.0), &request);

    assert!(plan.optimized_cost <= plan.baseline_cost);
    // Every normal candidate buys cheap energy at midnight
    assert_eq!(plan.steps[0].status(), BatteryStatus::Charging);
    assert!((plan.savings - (plan.baseline_cost - plan.optimized_cost)).abs() < 1e-12);
    for step in &plan.steps {
        assert!(step.soc_pct >= 20);
        assert!(step.battery_kw.abs() <= request.power_limit_kw + 1e-12);
    }
}

#[test]
fn test_comfort_mode_off_peak_deficit() {
    // 02:00, rate 0.5, 1 kW deficit and no PV
    let forecast = vec![ForecastPoint::new(midnight() + Duration::hours(2), 1.0)];
    let request = DispatchRequest {
        mode: DispatchMode::parse_lenient("conforto"),
        ..Default::default()
    };
    let plan = DispatchOptimizer::default().optimize(&forecast, &request);

    assert_eq!(plan.steps[0].tariff_rate, 0.5);
    assert_eq!(plan.steps[0].battery_kw, 0.0);
    assert_eq!(plan.steps[0].grid_optimized_kw, 1.0);
}

#[test]
fn test_optimize_is_bit_identical() {
    let goal = parse_goal("quero economizar 90 reais por mês");
    let request = DispatchRequest::default().with_goal(goal.as_ref());
    let optimizer = DispatchOptimizer::default();

    let a = optimizer.optimize(&day_ahead(2.2), &request);
    let b = optimizer.optimize(&day_ahead(2.2), &request);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_costs_over_history_and_forecast() {
    let history = hourly(&[1.0; 48]);
    let now = history.last().unwrap().timestamp;
    let forecast: Vec<ForecastPoint> = (1..=24)
        .map(|h| ForecastPoint::new(now + Duration::hours(h), 1.0))
        .collect();

    let summary = CostAccountant::summarize(now, 1.0, &forecast, Some(&history));
    // 13 off hours, 7 mid, 4 peak
    let day_cost = 13.0 * 0.5 + 7.0 * 0.8 + 4.0 * 1.2;
    assert!((summary.forecast_cost_24h - day_cost).abs() < 1e-9);
    assert!((summary.today_cost.unwrap() - day_cost).abs() < 1e-9);
    assert_eq!(summary.current_cost, 0.5);
    assert_eq!(summary.next_peak, Some(now + Duration::hours(19)));
}
