use serde::{Deserialize, Serialize};

/// User-selected dispatch behaviour.
///
/// Parsing accepts the Portuguese names used by the dashboard as aliases.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(ascii_case_insensitive)]
pub enum DispatchMode {
    #[default]
    #[strum(to_string = "normal")]
    Normal,
    #[strum(to_string = "eco", serialize = "economico", serialize = "agressivo")]
    Eco,
    #[strum(to_string = "comfort", serialize = "conforto", serialize = "confortavel")]
    Comfort,
}

impl DispatchMode {
    /// Unknown text falls back to [`DispatchMode::Normal`].
    pub fn parse_lenient(text: &str) -> Self {
        text.trim().parse().unwrap_or_default()
    }

    /// Threshold candidates tried in order by the optimizer.
    pub fn candidates(self) -> &'static [ThresholdPolicy] {
        match self {
            DispatchMode::Normal => &NORMAL_CANDIDATES,
            DispatchMode::Eco => &ECO_CANDIDATES,
            DispatchMode::Comfort => &COMFORT_CANDIDATES,
        }
    }

    /// Comfort mode never buys energy to charge the battery.
    pub fn allows_grid_charging(self) -> bool {
        !matches!(self, DispatchMode::Comfort)
    }
}

/// Tariff thresholds steering one dispatch simulation.
///
/// The battery discharges while the rate is at or above
/// `discharge_threshold` and charges from the grid while it is at or below
/// `charge_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub discharge_threshold: f64,
    pub charge_threshold: f64,
}

impl ThresholdPolicy {
    pub const fn new(discharge_threshold: f64, charge_threshold: f64) -> Self {
        Self {
            discharge_threshold,
            charge_threshold,
        }
    }
}

static NORMAL_CANDIDATES: [ThresholdPolicy; 3] = [
    ThresholdPolicy::new(1.0, 0.6),
    ThresholdPolicy::new(0.9, 0.7),
    ThresholdPolicy::new(0.8, 0.8),
];

static ECO_CANDIDATES: [ThresholdPolicy; 3] = [
    ThresholdPolicy::new(0.9, 0.7),
    ThresholdPolicy::new(0.8, 0.8),
    ThresholdPolicy::new(0.75, 0.85),
];

// Only the 1.2 peak rate clears 1.1; the negative charge threshold is never met
static COMFORT_CANDIDATES: [ThresholdPolicy; 1] = [ThresholdPolicy::new(1.1, -1.0)];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("normal", DispatchMode::Normal)]
    #[case("eco", DispatchMode::Eco)]
    #[case("economico", DispatchMode::Eco)]
    #[case("Agressivo", DispatchMode::Eco)]
    #[case("conforto", DispatchMode::Comfort)]
    #[case("confortavel", DispatchMode::Comfort)]
    #[case("COMFORT", DispatchMode::Comfort)]
    #[case(" eco ", DispatchMode::Eco)]
    #[case("turbo", DispatchMode::Normal)]
    #[case("", DispatchMode::Normal)]
    fn test_parse_lenient(#[case] text: &str, #[case] expected: DispatchMode) {
        assert_eq!(DispatchMode::parse_lenient(text), expected);
    }

    #[test]
    fn test_display_round_trips() {
        use strum::IntoEnumIterator;
        for mode in DispatchMode::iter() {
            assert_eq!(DispatchMode::parse_lenient(&mode.to_string()), mode);
        }
    }

    #[test]
    fn test_candidate_tables() {
        assert_eq!(DispatchMode::Normal.candidates().len(), 3);
        assert_eq!(DispatchMode::Eco.candidates()[2], ThresholdPolicy::new(0.75, 0.85));
        assert_eq!(DispatchMode::Comfort.candidates(), &[ThresholdPolicy::new(1.1, -1.0)]);
        assert!(!DispatchMode::Comfort.allows_grid_charging());
        assert!(DispatchMode::Eco.allows_grid_charging());
    }
}
