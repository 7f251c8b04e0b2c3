//! # Equipment Simulation Module
//!
//! Simplified physical model of a home installation: PV panels, one
//! battery and the grid connection.
//!
//! ## Components
//!
//! - **Solar**: diurnal PV estimate with a hot-day derate
//! - **Equipment**: battery step state machine, history replay and live ticking
//! - **Synthetic**: generated load history for cold starts and simulated streams
//!
//! ## Usage
//!
//! ```rust
//! use home_energy_planner::domain::BatteryState;
//! use home_energy_planner::simulation::step;
//!
//! let battery = BatteryState::new(10.0, 2.0, 50.0);
//! let (battery, battery_kw) = step(battery, 3.0, 0.0, 1.0);
//!
//! assert_eq!(battery_kw, 2.0);
//! assert!((battery.soc_kwh - 3.0).abs() < 1e-9);
//! ```

pub mod equipment;
pub mod solar;
pub mod synthetic;

pub use equipment::{step, EquipmentSimulator, EquipmentSnapshot, LiveBattery};
pub use solar::{estimate_pv, PvModel};
pub use synthetic::{SyntheticLoadConfig, SyntheticLoadGenerator};
