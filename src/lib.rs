//! # Home Energy Planner
//!
//! Short-horizon household load forecasting, a simplified PV + battery +
//! grid simulation, and a tariff-aware battery dispatch planner.
//!
//! - [`forecast`]: lag features, recursive multi-step forecasting over a
//!   pluggable [`forecast::LoadPredictor`], reference estimators and metrics
//! - [`simulation`]: PV estimate, battery step model, synthetic load
//! - [`optimizer`]: threshold-policy dispatch search and savings goals
//! - [`pricing`]: time-of-use tariff and cost accounting
//! - [`monitor`]: drift, anomalies, KPIs and alerts
//! - [`planner`]: the end-to-end report
//! - [`stream`]: per-connection live ticks with their own battery

pub mod config;
pub mod domain;
pub mod forecast;
pub mod monitor;
pub mod optimizer;
pub mod planner;
pub mod pricing;
pub mod simulation;
pub mod stream;
pub mod telemetry;
