//! Engine settings
//!
//! Persisted as JSON, separately from progress and session snapshots. A missing
//! or unreadable settings file falls back to defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_POP_POINTS, DEFAULT_TICK_INTERVAL_MS};
use crate::error::StoreError;
use crate::sim::{DEFAULT_MAX_LEVEL, LevelFactory, Playfield};

/// Strategy table shipped with the engine
pub const DEFAULT_STRATEGY_CONFIG: &str = include_str!("../assets/radius_config.txt");

/// Default settings file (native)
pub const DEFAULT_SETTINGS_PATH: &str = "bubbles_settings.json";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Milliseconds between simulation ticks
    pub tick_interval_ms: u64,
    /// Highest selectable level
    pub max_level: u32,
    /// Score awarded per popped bubble
    pub pop_points: u32,
    /// Fixed RNG seed; random when unset
    pub seed: Option<u64>,
    /// Strategy table file; the bundled table is used when unset
    pub strategy_config: Option<PathBuf>,
    /// Where the achieved level is stored (native)
    pub progress_path: PathBuf,
    /// Known playfield size, if the host reports it up front
    pub playfield: Option<Playfield>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_level: DEFAULT_MAX_LEVEL,
            pop_points: DEFAULT_POP_POINTS,
            seed: None,
            strategy_config: None,
            progress_path: PathBuf::from("bubbles_progress.json"),
            playfield: None,
        }
    }
}

impl EngineSettings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "bubbles_settings";

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Strategy table text: the configured file, or the bundled default
    pub fn strategy_source(&self) -> String {
        match &self.strategy_config {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(source) => source,
                Err(err) => {
                    log::error!(
                        "Could not read strategy config {}: {}, using bundled table",
                        path.display(),
                        err
                    );
                    DEFAULT_STRATEGY_CONFIG.to_string()
                }
            },
            None => DEFAULT_STRATEGY_CONFIG.to_string(),
        }
    }

    /// Level factory built from the configured strategy table
    pub fn level_factory(&self) -> LevelFactory {
        LevelFactory::load_or_default(self.strategy_source().lines())
            .with_max_level(self.max_level)
    }

    /// Load settings from a JSON file, defaulting when it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::info!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match Self::try_load_local() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Ok(None) => {
                log::info!("No stored settings, using defaults");
                Self::default()
            }
            Err(err) => {
                log::info!("Using default settings ({})", err);
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn try_load_local() -> Result<Option<Self>, StoreError> {
        let storage = crate::persistence::local_storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(Some(serde_json::from_str(&json)?)),
            Ok(None) => Ok(None),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StoreError> {
        let storage = crate::persistence::local_storage()?;
        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("Settings saved");
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(Path::new(DEFAULT_SETTINGS_PATH))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(Path::new(DEFAULT_SETTINGS_PATH))
    }
}
