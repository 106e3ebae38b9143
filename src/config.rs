use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub weights: RiskWeights,
    pub traffic: FactorThresholds,
    pub weather: FactorThresholds,
    pub demand: FactorThresholds,
    pub temperature: TemperatureThresholds,
    pub classification: ClassificationThresholds,
    pub data: DataConfig,
}

/// Relative contribution of each factor to the combined score.
/// Designed to sum to 1.0 but not required to.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RiskWeights {
    pub traffic: f64,
    pub weather: f64,
    pub demand: f64,
}

/// Breakpoints of a factor's piecewise-linear score map. A factor section
/// in the config file must spell out all three breakpoints; omitting the
/// section entirely keeps the built-in triple for that factor.
#[derive(Debug, Deserialize, Clone)]
pub struct FactorThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TemperatureThresholds {
    pub cold_risk: f64,
    pub hot_risk: f64,
}

/// Cut points for Low/Medium/High classification, inclusive on the lower tier.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub low: f64,
    pub medium: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub features_path: String,
    pub output_dir: String,
    pub city_tiers_csv: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            traffic: FactorThresholds::traffic(),
            weather: FactorThresholds::weather(),
            demand: FactorThresholds::demand(),
            temperature: TemperatureThresholds::default(),
            classification: ClassificationThresholds::default(),
            data: DataConfig::default(),
        }
    }
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            traffic: 0.40,
            weather: 0.35,
            demand: 0.25,
        }
    }
}

impl FactorThresholds {
    /// Congestion level breakpoints (0-1 scale).
    pub fn traffic() -> Self {
        Self {
            low: 0.3,
            medium: 0.6,
            high: 0.8,
        }
    }

    /// Daily rainfall breakpoints (mm).
    pub fn weather() -> Self {
        Self {
            low: 5.0,
            medium: 15.0,
            high: 30.0,
        }
    }

    /// Demand index breakpoints (0-1 scale).
    pub fn demand() -> Self {
        Self {
            low: 0.5,
            medium: 0.7,
            high: 0.85,
        }
    }
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            cold_risk: 10.0,
            hot_risk: 40.0,
        }
    }
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            low: 30.0,
            medium: 60.0,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            features_path: "data/processed/daily_city_features.csv".into(),
            output_dir: "outputs".into(),
            city_tiers_csv: None,
        }
    }
}

impl Config {
    /// Load config from a TOML file. A missing file falls back to defaults;
    /// an unreadable or malformed file is fatal.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        tracing::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Reject parameter sets the scoring functions are not defined over.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, w) in [
            ("weights.traffic", self.weights.traffic),
            ("weights.weather", self.weights.weather),
            ("weights.demand", self.weights.demand),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a non-negative finite number, got {w}"
                )));
            }
        }

        for (name, t) in [
            ("traffic", &self.traffic),
            ("weather", &self.weather),
            ("demand", &self.demand),
        ] {
            if !(t.low.is_finite() && t.medium.is_finite() && t.high.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} thresholds must be finite"
                )));
            }
            if !(0.0 < t.low && t.low < t.medium && t.medium < t.high) {
                return Err(ConfigError::Invalid(format!(
                    "{name} thresholds must satisfy 0 < low < medium < high, got {}/{}/{}",
                    t.low, t.medium, t.high
                )));
            }
        }

        // Traffic and demand scale their top band over (1.0 - high).
        for (name, t) in [("traffic", &self.traffic), ("demand", &self.demand)] {
            if t.high >= 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}.high must be below 1.0, got {}",
                    t.high
                )));
            }
        }

        if !(self.temperature.cold_risk.is_finite() && self.temperature.hot_risk.is_finite()) {
            return Err(ConfigError::Invalid(
                "temperature thresholds must be finite".into(),
            ));
        }
        if self.temperature.cold_risk >= self.temperature.hot_risk {
            return Err(ConfigError::Invalid(format!(
                "temperature.cold_risk ({}) must be below temperature.hot_risk ({})",
                self.temperature.cold_risk, self.temperature.hot_risk
            )));
        }

        let c = &self.classification;
        if !(c.low.is_finite() && c.medium.is_finite()) || !(0.0 < c.low && c.low < c.medium) {
            return Err(ConfigError::Invalid(format!(
                "classification cut points must satisfy 0 < low < medium, got {}/{}",
                c.low, c.medium
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn default_weights_match_policy() {
        let w = RiskWeights::default();
        assert_eq!(w.traffic, 0.40);
        assert_eq!(w.weather, 0.35);
        assert_eq!(w.demand, 0.25);
    }

    #[test]
    fn negative_weight_rejected() {
        let mut config = Config::default();
        config.weights.weather = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unordered_thresholds_rejected() {
        let mut config = Config::default();
        config.weather.medium = config.weather.high + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn traffic_high_at_one_rejected() {
        let mut config = Config::default();
        config.traffic.high = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_temperature_rejected() {
        let mut config = Config::default();
        config.temperature.cold_risk = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_cut_points_rejected() {
        let mut config = Config::default();
        config.classification.low = 70.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [weights]
            traffic = 0.5
            weather = 0.3
            demand = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.weights.traffic, 0.5);
        assert_eq!(config.traffic.high, 0.8);
        assert_eq!(config.classification.medium, 60.0);
    }

    #[test]
    fn partial_factor_section_rejected() {
        // A present factor section must spell out the full triple.
        let result: Result<Config, _> = toml::from_str(
            r#"
            [weather]
            high = 40.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn factor_section_overrides_builtin() {
        let config: Config = toml::from_str(
            r#"
            [weather]
            low = 2.0
            medium = 10.0
            high = 25.0
            "#,
        )
        .unwrap();
        assert_eq!(config.weather.high, 25.0);
        assert_eq!(config.traffic.high, 0.8);
    }

    #[test]
    fn malformed_toml_is_fatal() {
        let dir = std::env::temp_dir().join("cityrisk_cfg_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[weights\ntraffic = ").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = Config::load("definitely/not/a/real/config.toml").unwrap();
        assert_eq!(config.weights.traffic, 0.40);
    }
}
