//! Last-used session settings, persisted with file locking.
//!
//! Settings are a flat JSON object of optional keys, so a file missing a key
//! (or an older file) still contributes whatever it does have.

use crate::{Error, Result, SessionConfig};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Values remembered from the previous workout
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SavedSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_ml: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creatine_grams: Option<f64>,
}

impl SavedSettings {
    pub fn is_empty(&self) -> bool {
        self.duration_minutes.is_none() && self.water_ml.is_none() && self.creatine_grams.is_none()
    }

    /// Fill `fallback` with whichever values were saved
    pub fn apply_to(&self, fallback: SessionConfig) -> SessionConfig {
        SessionConfig {
            duration_minutes: self.duration_minutes.unwrap_or(fallback.duration_minutes),
            water_ml: self.water_ml.unwrap_or(fallback.water_ml),
            creatine_grams: self.creatine_grams.unwrap_or(fallback.creatine_grams),
        }
    }
}

impl From<&SessionConfig> for SavedSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            duration_minutes: Some(config.duration_minutes),
            water_ml: Some(config.water_ml),
            creatine_grams: Some(config.creatine_grams),
        }
    }
}

/// Key-value storage for the last-used configuration
pub trait SettingsStore {
    fn load(&self) -> Result<SavedSettings>;
    fn save(&self, config: &SessionConfig) -> Result<()>;
}

/// JSON file store with shared/exclusive locking and atomic writes
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the conventional location inside a data directory
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    /// Load saved settings with a shared lock
    ///
    /// A missing file means nothing was saved. An unreadable or corrupted
    /// file is logged and treated the same way.
    fn load(&self) -> Result<SavedSettings> {
        let path = &self.path;
        if !path.exists() {
            tracing::info!("No settings file found, nothing saved yet");
            return Ok(SavedSettings::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open settings file {:?}: {}. Ignoring.", path, e);
                return Ok(SavedSettings::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock settings file {:?}: {}. Ignoring.", path, e);
            return Ok(SavedSettings::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read settings file {:?}: {}. Ignoring.", path, e);
            return Ok(SavedSettings::default());
        }

        file.unlock()?;

        match serde_json::from_str::<SavedSettings>(&contents) {
            Ok(settings) => {
                tracing::debug!("Loaded settings from {:?}", path);
                Ok(settings)
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings file {:?}: {}. Ignoring.", path, e);
                Ok(SavedSettings::default())
            }
        }
    }

    /// Write all three values through a temp file renamed over the original
    fn save(&self, config: &SessionConfig) -> Result<()> {
        let path = &self.path;
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("settings path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&SavedSettings::from(config))?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }
}
