use std::path::Path;

use feed_reader::models::timeframe::TimeFrame;
use serde::Deserialize;
use shared_utils::config::{ConfigError, load_toml, parse_toml};

use crate::{classify::Thresholds, errors::Error, learner::TrainConfig};

/// Windowing of the normalized series.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Rows per input window (trading days for daily bars).
    pub window_length: usize,
    /// Leading share of rows used for training.
    pub train_fraction: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_length: 45,
            train_fraction: 0.8,
        }
    }
}

/// Top-level pipeline configuration, read from TOML.
///
/// ```toml
/// symbol = "MSFT"
/// timeframe = "1D"
/// lookback_days = 730
///
/// [window]
/// window_length = 45
/// train_fraction = 0.8
///
/// [training]
/// batch_size = 1
/// epochs = 20
///
/// [thresholds]
/// sell = -0.01
/// buy = 0.01
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub training: TrainConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
}

fn default_timeframe() -> String {
    "1D".to_string()
}

fn default_lookback_days() -> u32 {
    730
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let config: Self = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn timeframe(&self) -> Result<TimeFrame, Error> {
        self.timeframe
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("timeframe: {e}")).into())
    }

    fn validate(&self) -> Result<(), Error> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".into()).into());
        }
        if self.window.window_length == 0 {
            return Err(Error::InvalidWindowLength);
        }
        let fraction = self.window.train_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(Error::InvalidTrainFraction(fraction));
        }
        self.training
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.timeframe()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = PipelineConfig::from_toml_str(r#"symbol = "MSFT""#).unwrap();

        assert_eq!(config.window, WindowConfig { window_length: 45, train_fraction: 0.8 });
        assert_eq!(config.training.batch_size, 1);
        assert_eq!(config.training.epochs, 20);
        assert_eq!(config.lookback_days, 730);
        assert_eq!(config.timeframe().unwrap(), TimeFrame::day());
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
symbol = "AAPL"
timeframe = "1W"
lookback_days = 365

[window]
window_length = 10

[thresholds]
sell = -0.05
buy = 0.05
"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.symbol, "AAPL");
        assert_eq!(config.window.window_length, 10);
        assert_eq!(config.window.train_fraction, 0.8);
        assert_eq!(config.thresholds, Thresholds { sell: -0.05, buy: 0.05 });
        assert_eq!(config.timeframe().unwrap().to_string(), "1W");
    }

    #[test]
    fn rejects_unknown_and_invalid_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("symbol = \"MSFT\"\nwindows = 3"),
            Err(Error::Config(ConfigError::Parse(_)))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("symbol = \"MSFT\"\n[window]\ntrain_fraction = 0.0"),
            Err(Error::InvalidTrainFraction(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("symbol = \"MSFT\"\ntimeframe = \"7X\""),
            Err(Error::Config(ConfigError::Invalid(_)))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("symbol = \"MSFT\"\n[training]\nepochs = 0"),
            Err(Error::Config(ConfigError::Invalid(_)))
        ));
    }
}
