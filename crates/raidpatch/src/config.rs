//! User configuration.
//!
//! Read from `config.toml` in the platform config directory
//! (e.g. `%APPDATA%\raidpatch\config.toml`). Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

const CONFIG_DIR: &str = "raidpatch";
const CONFIG_FILE: &str = "config.toml";

/// Configuration for locating and patching the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidpatchConfig {
    /// Steam installation directory, skips registry lookup
    pub steam_path: Option<PathBuf>,
    /// Game root directory, skips Steam discovery entirely
    pub game_root: Option<PathBuf>,
    /// Re-read the executable after patching and check the raid getter
    pub verify_after_patch: bool,
}

impl Default for RaidpatchConfig {
    fn default() -> Self {
        Self {
            steam_path: None,
            game_root: None,
            verify_after_patch: true,
        }
    }
}

impl RaidpatchConfig {
    /// Create a new configuration builder
    pub fn builder() -> RaidpatchConfigBuilder {
        RaidpatchConfigBuilder::default()
    }

    /// Default config file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }
}

/// Builder for RaidpatchConfig
#[derive(Debug, Clone, Default)]
pub struct RaidpatchConfigBuilder {
    steam_path: Option<PathBuf>,
    game_root: Option<PathBuf>,
    verify_after_patch: Option<bool>,
}

impl RaidpatchConfigBuilder {
    pub fn steam_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.steam_path = Some(path.into());
        self
    }

    pub fn game_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.game_root = Some(path.into());
        self
    }

    pub fn verify_after_patch(mut self, enabled: bool) -> Self {
        self.verify_after_patch = Some(enabled);
        self
    }

    pub fn build(self) -> RaidpatchConfig {
        let default = RaidpatchConfig::default();
        RaidpatchConfig {
            steam_path: self.steam_path.or(default.steam_path),
            game_root: self.game_root.or(default.game_root),
            verify_after_patch: self
                .verify_after_patch
                .unwrap_or(default.verify_after_patch),
        }
    }
}
