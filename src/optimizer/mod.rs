//! # Battery Dispatch Optimizer
//!
//! Tariff-driven day-ahead scheduling. A [`DispatchMode`] selects a small
//! table of [`ThresholdPolicy`] candidates; [`DispatchOptimizer`] simulates
//! each over the load forecast and keeps the cheapest (or the first one that
//! meets a savings goal).

pub mod adaptive;
pub mod constraints;
pub mod goal;
pub mod policy;
pub mod types;

pub use adaptive::*;
pub use constraints::*;
pub use goal::*;
pub use policy::*;
pub use types::*;
