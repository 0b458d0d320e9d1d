use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::estimator::EstimatorConfig;
use crate::rolling::{ExpandingConfig, RollingConfig};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "EDGE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub rolling: RollingSection,
    #[serde(default)]
    pub expanding: ExpandingSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RollingSection {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default)]
    pub min_periods: Option<usize>,
    #[serde(default = "default_step")]
    pub step: usize,
}

impl Default for RollingSection {
    fn default() -> Self {
        Self {
            window: default_window(),
            min_periods: None,
            step: default_step(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpandingSection {
    #[serde(default = "default_expanding_min_periods")]
    pub min_periods: usize,
}

impl Default for ExpandingSection {
    fn default() -> Self {
        Self {
            min_periods: default_expanding_min_periods(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_window() -> usize {
    21
}

fn default_step() -> usize {
    1
}

fn default_expanding_min_periods() -> usize {
    1
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from `$EDGE_CONFIG` (after reading `.env`), falling back to `config/default.toml`.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse configuration")?;
        config
            .rolling_config()
            .validate()
            .context("rolling section is invalid")?;
        config
            .expanding_config()
            .validate()
            .context("expanding section is invalid")?;
        Ok(config)
    }

    pub fn rolling_config(&self) -> RollingConfig {
        RollingConfig {
            window: self.rolling.window,
            min_periods: self.rolling.min_periods,
            step: self.rolling.step,
            sign: self.estimator.sign,
            mid: self.estimator.mid,
        }
    }

    pub fn expanding_config(&self) -> ExpandingConfig {
        ExpandingConfig {
            min_periods: self.expanding.min_periods,
            sign: self.estimator.sign,
            mid: self.estimator.mid,
        }
    }
}
