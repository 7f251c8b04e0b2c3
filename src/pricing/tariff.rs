//! Fixed time-of-use tariff
//!
//! Rates depend only on the hour of day:
//! - peak: 18:00-21:59, 1.2 per kWh
//! - mid: 11:00-17:59, 0.8 per kWh
//! - off: everything else, 0.5 per kWh

use chrono::Timelike;
use serde::{Deserialize, Serialize};

pub const PEAK_RATE: f64 = 1.2;
pub const MID_RATE: f64 = 0.8;
pub const OFF_RATE: f64 = 0.5;

/// Tariff period of the time-of-use schedule
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TariffPeriod {
    Off,
    Mid,
    Peak,
}

impl TariffPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            18..=21 => TariffPeriod::Peak,
            11..=17 => TariffPeriod::Mid,
            _ => TariffPeriod::Off,
        }
    }

    /// Price per kWh in this period
    pub fn rate(self) -> f64 {
        match self {
            TariffPeriod::Peak => PEAK_RATE,
            TariffPeriod::Mid => MID_RATE,
            TariffPeriod::Off => OFF_RATE,
        }
    }
}

/// Maps instants onto the fixed time-of-use schedule. Dates are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TariffClock;

impl TariffClock {
    pub fn period<T: Timelike>(ts: &T) -> TariffPeriod {
        TariffPeriod::from_hour(ts.hour())
    }

    pub fn rate<T: Timelike>(ts: &T) -> f64 {
        Self::period(ts).rate()
    }
}
