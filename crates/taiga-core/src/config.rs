use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub downloads: DownloadsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    /// Static allow-list of Telegram user ids permitted to use the bot.
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadsConfig {
    pub work_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let defaults: AppConfig =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let user_path = Self::config_path();
        if user_path.exists() {
            let user_str = std::fs::read_to_string(&user_path)?;
            let user: AppConfig =
                toml::from_str(&user_str).map_err(|e| ConfigError::Invalid(e.to_string()))?;
            Ok(user)
        } else {
            Ok(defaults)
        }
    }

    /// True when the user id is on the static allow-list.
    pub fn is_authorized(&self, user_id: u64) -> bool {
        self.telegram.allowed_users.contains(&user_id)
    }

    /// Directory that holds per-chat scratch folders for downloads.
    pub fn work_dir(&self) -> PathBuf {
        self.downloads.work_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|d| d.cache_dir().join("downloads"))
                .unwrap_or_else(|| PathBuf::from("downloads"))
        })
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "taiga")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
