//! Configuration file support for Fittrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Display preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Label printed after weights and volumes
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            weight_unit: default_weight_unit(),
        }
    }
}

/// Statistics view parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsConfig {
    /// How many exercises the most-frequently-trained ranking shows
    #[serde(default = "default_top_exercises")]
    pub top_exercises: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            top_exercises: default_top_exercises(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("fittrack")
}

fn default_weight_unit() -> String {
    "lbs".into()
}

fn default_top_exercises() -> usize {
    5
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.stats.top_exercises == 0 {
            return Err(Error::Config(
                "stats.top_exercises must be at least 1".into(),
            ));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("fittrack").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
