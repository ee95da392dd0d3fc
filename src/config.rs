use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::errors::{Error, Result};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "callgauge.toml";

/// Overall-rating band thresholds used by the performance distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    /// Ratings at or above this value count as excellent (0.0-10.0)
    #[serde(default = "default_excellent_min")]
    pub excellent_min: f64,

    /// Ratings at or above this value count as good (0.0-10.0)
    #[serde(default = "default_good_min")]
    pub good_min: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            excellent_min: default_excellent_min(),
            good_min: default_good_min(),
        }
    }
}

impl PerformanceThresholds {
    // Pure function: check a threshold is on the rating scale
    fn is_valid_threshold(value: f64) -> bool {
        (0.0..=10.0).contains(&value)
    }

    fn validate(&self) -> Result<()> {
        if !Self::is_valid_threshold(self.excellent_min) {
            return Err(Error::configuration(
                "excellent_min must be between 0.0 and 10.0",
            ));
        }
        if !Self::is_valid_threshold(self.good_min) {
            return Err(Error::configuration("good_min must be between 0.0 and 10.0"));
        }
        if self.good_min >= self.excellent_min {
            return Err(Error::configuration(
                "good_min must be below excellent_min",
            ));
        }
        Ok(())
    }
}

/// Output preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used when the CLI is invoked without `--format`
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

/// Root configuration loaded from `callgauge.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallgaugeConfig {
    #[serde(default)]
    pub performance: PerformanceThresholds,

    #[serde(default)]
    pub output: OutputConfig,
}

impl CallgaugeConfig {
    pub fn validate(&self) -> Result<()> {
        self.performance.validate()
    }
}

fn default_excellent_min() -> f64 {
    8.0
}

fn default_good_min() -> f64 {
    6.0
}

fn default_format() -> String {
    "terminal".to_string()
}

/// Load configuration from an explicit file, falling back to defaults
/// when the file does not exist.
pub fn load_config(path: &Path) -> Result<CallgaugeConfig> {
    if !path.exists() {
        return Ok(CallgaugeConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: CallgaugeConfig = toml::from_str(&content)
        .map_err(|err| Error::configuration(format!("{}: {err}", path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Process-wide configuration, loaded once from the working directory.
/// Invalid or unreadable files fall back to defaults with a warning.
pub fn get_config() -> &'static CallgaugeConfig {
    static CONFIG: OnceLock<CallgaugeConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        load_config(Path::new(CONFIG_FILE_NAME)).unwrap_or_else(|err| {
            log::warn!("ignoring {CONFIG_FILE_NAME}: {err}");
            CallgaugeConfig::default()
        })
    })
}
