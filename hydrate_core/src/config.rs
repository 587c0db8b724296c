//! Configuration file support for Hydrate.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/hydrate/config.toml`.

use crate::{
    Error, Result, SessionConfig, DEFAULT_CREATINE_GRAMS, DEFAULT_DURATION_MINUTES,
    DEFAULT_WATER_ML,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub reminders: RemindersConfig,
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

/// Values used when neither the command line nor saved settings give one
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,

    #[serde(default = "default_water_ml")]
    pub water_ml: u32,

    #[serde(default = "default_creatine_grams")]
    pub creatine_grams: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            duration_minutes: default_duration_minutes(),
            water_ml: default_water_ml(),
            creatine_grams: default_creatine_grams(),
        }
    }
}

impl DefaultsConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::clamped(self.duration_minutes, self.water_ml, self.creatine_grams)
    }
}

/// How reminders reach the user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Ring the terminal bell on reminders and completion
    #[serde(default = "default_true")]
    pub sound: bool,

    #[serde(default = "default_true")]
    pub notifications: bool,

    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            sound: true,
            notifications: true,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("hydrate")
}

fn default_duration_minutes() -> u32 {
    DEFAULT_DURATION_MINUTES
}

fn default_water_ml() -> u32 {
    DEFAULT_WATER_ML
}

fn default_creatine_grams() -> f64 {
    DEFAULT_CREATINE_GRAMS
}

fn default_true() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("hydrate").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
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
