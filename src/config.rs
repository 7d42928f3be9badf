//! User configuration, read from `config.toml` in the data directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quizzes::history::DEFAULT_HISTORY_LIMIT;
use crate::quizzes::DEFAULT_TIMER_DURATION;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Entries kept in the global quiz history
    pub history_limit: usize,
    /// Per-question timer for new quizzes, in seconds
    pub default_timer_duration: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_timer_duration: DEFAULT_TIMER_DURATION,
        }
    }
}

impl Config {
    /// Default data directory (e.g., ~/.local/share/flashy)
    pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
        dirs::data_local_dir()
            .map(|p| p.join("flashy"))
            .ok_or(ConfigError::DataDirNotFound)
    }

    /// Load `config.toml` from `data_dir`, falling back to defaults if absent
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(data_dir)?;
        fs::write(data_dir.join(CONFIG_FILE), toml::to_string_pretty(self)?)?;
        Ok(())
    }
}
