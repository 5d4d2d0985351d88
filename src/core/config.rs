//! Game configuration
//!
//! Loads [`GameConfig`] from a JSON file. Missing keys take their defaults,
//! so an empty object `{}` is a valid config.
//!
//! # File Location
//!
//! Without an explicit path the config is read from `quantum-chess.json` in
//! the user's configuration directory (resolved through `directories`),
//! falling back to the working directory when no such directory exists.
//!
//! # Error Handling
//!
//! [`GameConfig::load`] reports every failure. [`GameConfig::load_or_default`]
//! logs the failure and falls back to defaults instead.

use super::error::{CoreError, CoreResult};
use crate::game::types::{BoardExtent, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config filename
const CONFIG_FILENAME: &str = "quantum-chess.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: u8,
    pub board_height: u8,
    /// Seed for measurement sampling; `None` seeds from the OS
    pub rng_seed: Option<u64>,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_width: BoardExtent::STANDARD.width,
            board_height: BoardExtent::STANDARD.height,
            rng_seed: None,
            log_filter: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Helper to resolve the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "trilltino", "QuantumChess") {
            proj_dirs.config_dir().join(CONFIG_FILENAME)
        } else {
            PathBuf::from(CONFIG_FILENAME)
        }
    }

    pub fn from_json(contents: &str) -> CoreResult<Self> {
        let config: GameConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&contents)?;
        info!("[CONFIG] Loaded config from {:?}", path);
        Ok(config)
    }

    /// Read a config file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("[CONFIG] No config file found at {:?}. Using defaults.", path);
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("[CONFIG] Failed to load config at {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !(1..=MAX_BOARD_WIDTH).contains(&self.board_width) {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "board_width must be within 1..={}, got {}",
                    MAX_BOARD_WIDTH, self.board_width
                ),
            });
        }
        if !(1..=MAX_BOARD_HEIGHT).contains(&self.board_height) {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "board_height must be within 1..={}, got {}",
                    MAX_BOARD_HEIGHT, self.board_height
                ),
            });
        }
        Ok(())
    }

    pub fn extent(&self) -> BoardExtent {
        BoardExtent::new(self.board_width, self.board_height)
    }
}
