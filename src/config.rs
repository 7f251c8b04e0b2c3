use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_CAPACITY_KWH;
use crate::forecast::{DEFAULT_HORIZON, DEFAULT_LAGS, DEFAULT_RIDGE_ALPHA};
use crate::optimizer::{clamp_to, DispatchMode, DispatchRequest, SOC_INIT_RANGE_PCT, SOC_MIN_RANGE_PCT};
use crate::optimizer::{POWER_LIMIT_RANGE_KW, PV_FACTOR_RANGE};
use crate::simulation::SyntheticLoadConfig;

pub const CONFIG_FILE: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "PLANNER__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub battery: BatteryConfig,
    pub solar: SolarConfig,
    pub dispatch: DispatchConfig,
    pub forecast: ForecastConfig,
    pub synthetic: SyntheticLoadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryConfig {
    pub capacity_kwh: f64,
    pub power_limit_kw: f64,
    pub soc_init_percent: f64,
    pub soc_min_percent: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: DEFAULT_CAPACITY_KWH,
            power_limit_kw: 2.0,
            soc_init_percent: 50.0,
            soc_min_percent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarConfig {
    pub pv_factor: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self { pv_factor: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Mode name; unknown names mean `normal`
    pub mode: String,
    /// Free-text savings goal
    pub goal: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Normal.to_string(),
            goal: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub n_lags: usize,
    pub horizon_hours: usize,
    /// Half-width of the uncertainty band in MAEs
    pub band_k: f64,
    pub ridge_alpha: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            n_lags: DEFAULT_LAGS,
            horizon_hours: DEFAULT_HORIZON,
            band_k: 1.5,
            ridge_alpha: DEFAULT_RIDGE_ALPHA,
        }
    }
}

impl Config {
    /// Defaults, then `config/default.toml`, then `PLANNER__*` variables.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().context("invalid planner configuration")?;
        Ok(config.clamped())
    }

    /// Force every numeric setting into its accepted range.
    pub fn clamped(mut self) -> Self {
        let defaults = Config::default();

        self.solar.pv_factor = clamp_to(self.solar.pv_factor, &PV_FACTOR_RANGE, defaults.solar.pv_factor);
        self.battery.power_limit_kw = clamp_to(
            self.battery.power_limit_kw,
            &POWER_LIMIT_RANGE_KW,
            defaults.battery.power_limit_kw,
        );
        self.battery.soc_init_percent = clamp_to(
            self.battery.soc_init_percent,
            &SOC_INIT_RANGE_PCT,
            defaults.battery.soc_init_percent,
        );
        self.battery.soc_min_percent = clamp_to(
            self.battery.soc_min_percent,
            &SOC_MIN_RANGE_PCT,
            defaults.battery.soc_min_percent,
        );
        if !(self.battery.capacity_kwh.is_finite() && self.battery.capacity_kwh > 0.0) {
            self.battery.capacity_kwh = defaults.battery.capacity_kwh;
        }
        if !(self.forecast.band_k.is_finite() && self.forecast.band_k >= 0.0) {
            self.forecast.band_k = defaults.forecast.band_k;
        }
        if !(self.forecast.ridge_alpha.is_finite() && self.forecast.ridge_alpha >= 0.0) {
            self.forecast.ridge_alpha = defaults.forecast.ridge_alpha;
        }
        self.synthetic.load_factor = clamp_to(self.synthetic.load_factor, &(0.5..=1.5), 1.0);
        self
    }

    pub fn dispatch_request(&self) -> DispatchRequest {
        DispatchRequest {
            pv_factor: self.solar.pv_factor,
            power_limit_kw: self.battery.power_limit_kw,
            soc_init_pct: self.battery.soc_init_percent,
            soc_min_pct: self.battery.soc_min_percent,
            capacity_kwh: self.battery.capacity_kwh,
            mode: DispatchMode::parse_lenient(&self.dispatch.mode),
            target_daily_savings: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        Config::from_figment(Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml)))
            .unwrap()
    }

    #[test]
    fn test_defaults_without_sources() {
        assert_eq!(from_toml(""), Config::default());
    }

    #[test]
    fn test_toml_overrides_and_clamping() {
        let config = from_toml(
            r#"
            [battery]
            power_limit_kw = 25.0
            soc_min_percent = 90.0

            [solar]
            pv_factor = 0.1

            [dispatch]
            mode = "conforto"
            goal = "5 reais por dia"
            "#,
        );

        assert_eq!(config.battery.power_limit_kw, 10.0);
        assert_eq!(config.battery.soc_min_percent, 80.0);
        assert_eq!(config.battery.capacity_kwh, DEFAULT_CAPACITY_KWH);
        assert_eq!(config.solar.pv_factor, 0.5);
        assert_eq!(config.dispatch.goal.as_deref(), Some("5 reais por dia"));

        let request = config.dispatch_request();
        assert_eq!(request.mode, DispatchMode::Comfort);
        assert_eq!(request.power_limit_kw, 10.0);
    }

    #[test]
    fn test_unknown_mode_is_normal() {
        let config = from_toml("[dispatch]\nmode = \"turbo\"");
        assert_eq!(config.dispatch_request().mode, DispatchMode::Normal);
    }

    #[test]
    fn test_bad_type_is_an_error() {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string("[battery]\ncapacity_kwh = \"big\""));
        assert!(Config::from_figment(figment).is_err());
    }
}
