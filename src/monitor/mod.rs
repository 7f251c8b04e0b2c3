//! # Data Quality Monitoring
//!
//! Detectors run directly on the load history: day-over-day drift of the
//! mean, rolling z-score anomalies, and the headline KPIs with their alerts.
//! Too little data yields an empty or "no signal" result rather than an error.

pub mod anomaly;
pub mod drift;
pub mod kpi;
pub mod stats;

pub use anomaly::*;
pub use drift::*;
pub use kpi::*;
