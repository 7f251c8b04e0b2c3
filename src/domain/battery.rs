use serde::{Deserialize, Serialize};

/// Usable capacity assumed for the home battery when none is configured.
pub const DEFAULT_CAPACITY_KWH: f64 = 10.0;

/// Battery operational status derived from the signed battery power
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BatteryStatus {
    Charging,
    Discharging,
    Idle,
}

impl BatteryStatus {
    /// Classify a battery power reading (positive = discharging to load).
    pub fn from_power_kw(battery_kw: f64) -> Self {
        if battery_kw > 0.0 {
            BatteryStatus::Discharging
        } else if battery_kw < 0.0 {
            BatteryStatus::Charging
        } else {
            BatteryStatus::Idle
        }
    }
}

/// Per-run battery state. Callers build a fresh one for every simulation or
/// optimization; nothing here is shared between runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BatteryState {
    pub capacity_kwh: f64,
    pub soc_kwh: f64,
    pub power_limit_kw: f64,
}

impl BatteryState {
    /// Build a battery from a state-of-charge percentage.
    ///
    /// Invalid inputs are clamped: capacity and power limit to `>= 0`, the
    /// percentage to `[0, 100]`. Non-finite values become zero.
    pub fn new(capacity_kwh: f64, power_limit_kw: f64, soc_percent: f64) -> Self {
        let capacity_kwh = non_negative(capacity_kwh);
        let power_limit_kw = non_negative(power_limit_kw);
        let soc_percent = clamp_percent(soc_percent, 100.0);
        Self {
            capacity_kwh,
            soc_kwh: soc_percent / 100.0 * capacity_kwh,
            power_limit_kw,
        }
    }

    pub fn with_default_capacity(power_limit_kw: f64, soc_percent: f64) -> Self {
        Self::new(DEFAULT_CAPACITY_KWH, power_limit_kw, soc_percent)
    }

    pub fn soc_percent(&self) -> f64 {
        if self.capacity_kwh > 0.0 {
            self.soc_kwh / self.capacity_kwh * 100.0
        } else {
            0.0
        }
    }

    /// State of charge as a whole percentage, as shown to users.
    pub fn soc_percent_rounded(&self) -> u8 {
        self.soc_percent().round().clamp(0.0, 100.0) as u8
    }

    pub fn is_full(&self) -> bool {
        self.soc_kwh >= self.capacity_kwh
    }

    pub fn is_empty(&self) -> bool {
        self.soc_kwh <= 0.0
    }
}

impl Default for BatteryState {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_KWH, 2.0, 50.0)
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Clamp a percentage to `[0, max]`, mapping non-finite input to zero.
pub fn clamp_percent(v: f64, max: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_inputs() {
        let b = BatteryState::new(10.0, -2.0, 150.0);
        assert_eq!(b.power_limit_kw, 0.0);
        assert_eq!(b.soc_kwh, 10.0);
        assert!(b.is_full());

        let b = BatteryState::new(10.0, 2.0, f64::NAN);
        assert!(b.is_empty());
    }

    #[test]
    fn test_soc_percent() {
        let b = BatteryState::with_default_capacity(2.0, 50.0);
        assert_eq!(b.soc_kwh, 5.0);
        assert_eq!(b.soc_percent_rounded(), 50);
    }

    #[test]
    fn test_status_from_power() {
        assert_eq!(BatteryStatus::from_power_kw(1.5), BatteryStatus::Discharging);
        assert_eq!(BatteryStatus::from_power_kw(-0.5), BatteryStatus::Charging);
        assert_eq!(BatteryStatus::from_power_kw(0.0), BatteryStatus::Idle);
        assert_eq!(BatteryStatus::Charging.to_string(), "charging");
    }

    #[test]
    fn test_zero_capacity_battery() {
        let b = BatteryState::new(0.0, 2.0, 50.0);
        assert_eq!(b.soc_percent(), 0.0);
        assert!(b.is_full());
    }
}
