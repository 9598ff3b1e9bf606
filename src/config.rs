use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::tariff::DEFAULT_RATE_EUR_PER_KWH;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tariff: TariffConfig,
    pub ml: MlConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// Rate applied for users without their own configured tariff.
    pub default_rate_eur_per_kwh: f64,
    /// IANA timezone the tariff bands are evaluated in.
    pub timezone: String,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            default_rate_eur_per_kwh: DEFAULT_RATE_EUR_PER_KWH,
            timezone: "Europe/Madrid".to_string(),
        }
    }
}

impl TariffConfig {
    pub fn timezone(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid timezone '{}': {e}", self.timezone))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MlConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl MlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Standard deviation of the demo jitter, as a fraction of the value.
    pub noise_fraction: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            noise_fraction: 0.05,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("ENERGIAPP__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.tariff.default_rate_eur_per_kwh, 0.15);
        assert_eq!(cfg.tariff.timezone, "Europe/Madrid");
        assert_eq!(cfg.ml.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.simulation.noise_fraction, 0.05);
    }

    #[test]
    fn test_timezone_parsing() {
        let cfg = TariffConfig::default();
        assert_eq!(cfg.timezone().unwrap(), chrono_tz::Europe::Madrid);

        let bad = TariffConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Default::default()
        };
        assert!(bad.timezone().is_err());
    }
}
